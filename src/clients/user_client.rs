use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{User, UserCreate, UserId, UserProfilePatch};
use crate::user_actor::{UserAction, UserError};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self), fields(user_name = %params.user_name))]
    pub async fn register(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        debug!("Sending request");
        self.inner.list().await.map_err(UserError::from)
    }

    /// Applies a partial profile update. Admin accounts are rejected with
    /// [`UserError::Forbidden`].
    #[instrument(skip(self))]
    pub async fn update_profile(&self, id: UserId, patch: UserProfilePatch) -> Result<User, UserError> {
        debug!("Sending request");
        let current = self
            .inner
            .get(id)
            .await
            .map_err(UserError::from)?
            .ok_or_else(|| UserError::NotFound(format!("User not found: {id}")))?;
        if current.is_admin() {
            warn!(user_id = %id, "Admin profile update refused");
            return Err(UserError::Forbidden(
                "Admins are not authorized to update user data".to_string(),
            ));
        }
        self.inner.update(id, patch).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn promote_to_admin(&self, id: UserId) -> Result<bool, UserError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, UserAction::PromoteToAdmin)
            .await
            .map_err(UserError::from)
    }
}
