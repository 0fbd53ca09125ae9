use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Feedback, FeedbackCreate, FeedbackId, User};
use crate::feedback_actor::FeedbackError;

/// Client for the feedback log.
#[derive(Clone)]
pub struct FeedbackClient {
    inner: ResourceClient<Feedback>,
}

impl_basic_client!(FeedbackClient, Feedback, FeedbackError, feedback);

impl FeedbackClient {
    /// Records feedback authored by `user`, signed with their display name.
    #[instrument(skip(self, user, message), fields(user_id = %user.id))]
    pub async fn submit(
        &self,
        user: &User,
        message: impl Into<String>,
        rating: u8,
    ) -> Result<FeedbackId, FeedbackError> {
        debug!("Sending request");
        let params = FeedbackCreate {
            user_id: user.id,
            name: user.display_name().to_string(),
            message: message.into(),
            rating,
        };
        self.inner.create(params).await.map_err(FeedbackError::from)
    }

    #[instrument(skip(self))]
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, FeedbackError> {
        debug!("Sending request");
        self.inner.list().await.map_err(FeedbackError::from)
    }
}
