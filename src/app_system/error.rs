use thiserror::Error;
use tokio::task::JoinError;

use crate::error::StorageError;

/// Failures while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to open store: {0}")]
    Storage(#[from] StorageError),
    #[error("actor task failed: {0}")]
    TaskFailed(#[from] JoinError),
}
