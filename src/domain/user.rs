use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub fullname: Option<String>,
    pub phone_no: Option<String>,
    pub address: Option<String>,
    pub post_code: Option<u32>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,
    #[validate(email)]
    pub email: String,
    pub fullname: Option<String>,
    pub phone_no: Option<String>,
}

impl UserCreate {
    pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
            fullname: None,
            phone_no: None,
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }
}

/// Partial profile update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserProfilePatch {
    pub fullname: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub address: Option<String>,
    pub post_code: Option<u32>,
}

impl User {
    /// Name shown next to user-authored content.
    pub fn display_name(&self) -> &str {
        self.fullname.as_deref().unwrap_or(&self.user_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
