#[macro_use]
mod macros;

mod cart_client;
mod feedback_client;
mod menu_client;
mod order_client;
mod user_client;

pub use cart_client::CartClient;
pub use feedback_client::FeedbackClient;
pub use menu_client::MenuClient;
pub use order_client::OrderClient;
pub use user_client::UserClient;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::error::StorageError;
use crate::messages::{ServiceResponse, StoreRequest};

// =============================================================================
// Store handle shared by the menu, cart and order clients
// =============================================================================

/// Channel to the store service plus the caller-side timeout.
///
/// When a request times out its response receiver is dropped; the store
/// service notices before committing and rolls the work back.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreRequest>,
    timeout: Duration,
}

impl StoreHandle {
    pub fn new(sender: mpsc::Sender<StoreRequest>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Sends a request and waits up to the configured timeout for the answer.
    ///
    /// A timeout error means the store either never ran the request or rolled
    /// it back, except when the deadline passed while the commit itself was in
    /// progress; then the work is applied and the store logs the undelivered
    /// result.
    async fn request<T, E>(&self, build: impl FnOnce(ServiceResponse<T, E>) -> StoreRequest) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| StorageError::new("store service closed"))?;
            response
                .await
                .map_err(|_| StorageError::new("store service dropped the request"))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(E::from(e)),
            Err(_) => {
                warn!(timeout = ?self.timeout, "Store request timed out");
                Err(E::from(StorageError::new(format!(
                    "request timed out after {:?}",
                    self.timeout
                ))))
            }
        }
    }

    pub async fn shutdown(&self) -> Result<(), StorageError> {
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|_| StorageError::new("store service closed"))
    }
}
