use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedbackError {
    #[error("Feedback not found: {0}")]
    NotFound(String),
    #[error("Feedback validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for FeedbackError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(msg) => FeedbackError::NotFound(msg),
            FrameworkError::Rejected(msg) | FrameworkError::Conflict(msg) => FeedbackError::ValidationError(msg),
            other => FeedbackError::ActorCommunicationError(other.to_string()),
        }
    }
}
