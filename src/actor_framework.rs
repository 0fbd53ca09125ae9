use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Patches, and Actions)
// =============================================================================

/// Trait that any entity must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Short name used in logs and error messages.
    const KIND: &'static str;

    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the allocated id and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    /// Keys that must be unique among stored entities. Checked on create and
    /// again after every update.
    fn unique_keys(&self) -> Vec<String> {
        Vec::new()
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    /// Handle a domain-specific action.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(kind = T::KIND))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Rejected),
                        None => Err(not_found::<T>(&id)),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Shutdown => {
                    info!("ResourceActor shutting down");
                    break;
                }
            }
        }
        info!("ResourceActor stopped");
    }

    fn create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.ensure_unique(&item, None)?;

        debug!(id = %id, "Created");
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    fn update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self.store.get(&id).ok_or_else(|| not_found::<T>(&id))?;
        // Patch a copy so a rejected update leaves the stored entity untouched.
        let mut updated = item.clone();
        updated.on_update(patch).map_err(FrameworkError::Rejected)?;
        self.ensure_unique(&updated, Some(&id))?;
        self.store.insert(id.clone(), updated.clone());
        debug!(id = %id, "Updated");
        Ok(updated)
    }

    fn ensure_unique(&self, item: &T, except: Option<&T::Id>) -> Result<(), FrameworkError> {
        for key in item.unique_keys() {
            let taken = self
                .store
                .iter()
                .filter(|(id, _)| Some(*id) != except)
                .any(|(_, existing)| existing.unique_keys().contains(&key));
            if taken {
                warn!(key = %key, "Duplicate key");
                return Err(FrameworkError::Conflict(format!("{} already exists: {}", T::KIND, key)));
            }
        }
        Ok(())
    }

    fn delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self.store.get(&id).ok_or_else(|| not_found::<T>(&id))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(&id);
        debug!(id = %id, "Deleted");
        Ok(())
    }
}

fn not_found<T: Entity>(id: &T::Id) -> FrameworkError {
    FrameworkError::NotFound(format!("{} not found: {}", T::KIND, id))
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Table {
        id: u64,
        label: String,
        seats: u32,
        occupied: bool,
    }

    #[derive(Debug)]
    enum TableAction {
        Seat,
    }

    impl Entity for Table {
        const KIND: &'static str = "Table";

        type Id = u64;
        type CreateParams = (String, u32);
        type Patch = u32;
        type Action = TableAction;
        type ActionResult = bool;

        fn id(&self) -> &u64 {
            &self.id
        }

        fn from_create_params(id: u64, (label, seats): (String, u32)) -> Result<Self, String> {
            Ok(Self {
                id,
                label,
                seats,
                occupied: false,
            })
        }

        fn unique_keys(&self) -> Vec<String> {
            vec![self.label.clone()]
        }

        fn on_update(&mut self, seats: u32) -> Result<(), String> {
            if seats == 0 {
                return Err("a table needs at least one seat".to_string());
            }
            self.seats = seats;
            Ok(())
        }

        fn on_delete(&self) -> Result<(), String> {
            if self.occupied {
                return Err("table is occupied".to_string());
            }
            Ok(())
        }

        fn handle_action(&mut self, action: TableAction) -> Result<bool, String> {
            match action {
                TableAction::Seat => {
                    let changed = !self.occupied;
                    self.occupied = true;
                    Ok(changed)
                }
            }
        }
    }

    fn start() -> ResourceClient<Table> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn lifecycle_hooks_guard_updates_and_deletes() {
        let client = start();
        let id = client.create(("T1".to_string(), 4)).await.unwrap();

        let rejected = client.update(id, 0).await;
        assert!(matches!(rejected, Err(FrameworkError::Rejected(_))));
        assert_eq!(client.get(id).await.unwrap().unwrap().seats, 4);

        assert_eq!(client.perform_action(id, TableAction::Seat).await, Ok(true));
        assert_eq!(client.perform_action(id, TableAction::Seat).await, Ok(false));

        let blocked = client.delete(id).await;
        assert_eq!(blocked, Err(FrameworkError::Rejected("table is occupied".to_string())));
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unique_keys_are_enforced_on_create() {
        let client = start();
        client.create(("T1".to_string(), 4)).await.unwrap();

        let duplicate = client.create(("T1".to_string(), 2)).await;

        assert_eq!(duplicate, Err(FrameworkError::Conflict("Table already exists: T1".to_string())));
    }

    #[tokio::test]
    async fn missing_entities_report_not_found() {
        let client = start();

        assert_eq!(client.get(7).await, Ok(None));
        assert_eq!(
            client.update(7, 2).await,
            Err(FrameworkError::NotFound("Table not found: 7".to_string()))
        );
    }

    #[tokio::test]
    async fn requests_after_shutdown_fail() {
        let client = start();
        client.shutdown().await.unwrap();

        // Requests queued behind the shutdown are dropped with the actor.
        let result = client.list().await;
        assert!(matches!(
            result,
            Err(FrameworkError::ActorClosed) | Err(FrameworkError::ActorDropped)
        ));
    }
}
