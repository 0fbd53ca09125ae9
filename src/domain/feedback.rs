use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FeedbackId, UserId};

/// A piece of customer feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub name: String,
    pub message: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

/// Payload for submitting feedback.
#[derive(Debug, Clone)]
pub struct FeedbackCreate {
    pub user_id: UserId,
    pub name: String,
    pub message: String,
    pub rating: u8,
}
