use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument};

use super::{AppConfig, SystemError};
use crate::actor_framework::ResourceActor;
use crate::actors::StoreService;
use crate::clients::{CartClient, FeedbackClient, MenuClient, OrderClient, StoreHandle, UserClient};
use crate::domain::{Feedback, User};
use crate::store::Database;

/// The main application system that orchestrates all actors.
///
/// Starts the store service plus the user and feedback actors, hands out
/// clients, and stops everything on [`OrderSystem::shutdown`].
pub struct OrderSystem {
    pub menu_client: MenuClient,
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub feedback_client: FeedbackClient,
    store: StoreHandle,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Opens the store and spawns every actor on the current runtime.
    #[instrument(name = "order_system", skip(config))]
    pub fn start(config: &AppConfig) -> Result<Self, SystemError> {
        info!(numbering = ?config.numbering, data_file = ?config.data_file, "Starting order system");

        // 1. Store service: menu, carts and the order ledger
        let db = Database::open(&config.store_config())?;
        let (store_service, store_sender) = StoreService::new(config.buffer_size, db);
        let store = StoreHandle::new(store_sender, config.request_timeout);
        let store_handle = tokio::spawn(store_service.run());

        // 2. User directory
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(config.buffer_size, counter());
        let user_handle = tokio::spawn(user_actor.run());

        // 3. Feedback log
        let (feedback_actor, feedback_resource_client) =
            ResourceActor::<Feedback>::new(config.buffer_size, counter());
        let feedback_handle = tokio::spawn(feedback_actor.run());

        Ok(Self {
            menu_client: MenuClient::new(store.clone()),
            cart_client: CartClient::new(store.clone()),
            order_client: OrderClient::new(store.clone()),
            user_client: UserClient::new(user_resource_client),
            feedback_client: FeedbackClient::new(feedback_resource_client),
            store,
            handles: vec![store_handle, user_handle, feedback_handle],
        })
    }

    /// Sends shutdown to every actor and waits for their tasks to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        // An actor that already stopped has closed its channel; nothing to do.
        let _ = self.store.shutdown().await;
        let _ = self.user_client.shutdown().await;
        let _ = self.feedback_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::TaskFailed(e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn counter() -> impl Fn() -> u64 + Send + Sync + 'static {
    let next = Arc::new(AtomicU64::new(1));
    move || next.fetch_add(1, Ordering::SeqCst)
}
