use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    CartLine, FoodId, MenuItem, MenuItemCreate, MenuItemPatch, OrderNo, OrderReceipt, OrderSummary, UserId,
};
use crate::error::{CartError, InventoryError, OrderError, StorageError};
use crate::messages::{ServiceResponse, StoreRequest};
use crate::order_engine;
use crate::store::{CartStore, Database, InventoryStore, OrderLedger, Transaction};

// =============================================================================
// STORE SERVICE
// =============================================================================

/// Owns the menu, cart and order tables.
///
/// Requests are processed one at a time and each runs in its own
/// [`Transaction`], so an order placement sees no concurrent writer between
/// its stock check and its commit.
pub struct StoreService {
    receiver: mpsc::Receiver<StoreRequest>,
    db: Database,
}

impl StoreService {
    pub fn new(buffer_size: usize, db: Database) -> (Self, mpsc::Sender<StoreRequest>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, db };
        (service, sender)
    }

    #[instrument(name = "store_service", skip(self))]
    pub async fn run(mut self) {
        info!(numbering = ?self.db.numbering(), "StoreService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::CreateMenuItem { params, respond_to } => {
                    self.handle_create_menu_item(params, respond_to);
                }
                StoreRequest::GetMenuItem { id, respond_to } => {
                    self.handle_get_menu_item(id, respond_to);
                }
                StoreRequest::ListMenuItems { respond_to } => {
                    self.handle_list_menu_items(respond_to);
                }
                StoreRequest::UpdateMenuItem { id, patch, respond_to } => {
                    self.handle_update_menu_item(id, patch, respond_to);
                }
                StoreRequest::DeleteMenuItem { id, respond_to } => {
                    self.handle_delete_menu_item(id, respond_to);
                }
                StoreRequest::AddCartLine {
                    user_id,
                    food_id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_add_cart_line(user_id, food_id, quantity, respond_to);
                }
                StoreRequest::ListCartLines { user_id, respond_to } => {
                    self.handle_list_cart_lines(user_id, respond_to);
                }
                StoreRequest::ClearCart { user_id, respond_to } => {
                    self.handle_clear_cart(user_id, respond_to);
                }
                StoreRequest::PlaceOrder { user_id, respond_to } => {
                    self.handle_place_order(user_id, respond_to);
                }
                StoreRequest::GetOrder { order_no, respond_to } => {
                    self.handle_get_order(order_no, respond_to);
                }
                StoreRequest::ListOrdersByDateRange { start, end, respond_to } => {
                    self.handle_list_orders_by_date_range(start, end, respond_to);
                }
                StoreRequest::Shutdown => {
                    info!("StoreService shutting down");
                    break;
                }
            }
        }
        info!("StoreService stopped");
    }

    /// Runs `work` in a fresh transaction and answers the caller.
    ///
    /// The transaction commits only if `work` succeeded and the caller is still
    /// waiting; a caller that timed out gets no side effects. A caller that
    /// gives up while the commit itself is running still sees a timeout even
    /// though the work is applied; [`deliver`] logs that case.
    fn transact<T, E>(
        &mut self,
        respond_to: ServiceResponse<T, E>,
        work: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    ) where
        E: From<StorageError> + std::fmt::Display,
    {
        if respond_to.is_closed() {
            warn!("Caller gone before processing, skipping request");
            return;
        }

        let mut tx = self.db.begin();
        let result = match work(&mut tx) {
            Ok(_) if respond_to.is_closed() => {
                warn!("Caller gone before commit, rolling back");
                tx.rollback();
                return;
            }
            Ok(value) => match tx.commit() {
                Ok(()) => Ok(value),
                Err(e) => {
                    error!(error = %e, "Commit failed");
                    Err(E::from(e))
                }
            },
            Err(e) => {
                debug!(error = %e, "Request rejected, rolling back");
                tx.rollback();
                Err(e)
            }
        };

        deliver(respond_to, result);
    }

    #[instrument(fields(name = %params.name), skip(self, params, respond_to))]
    fn handle_create_menu_item(
        &mut self,
        params: MenuItemCreate,
        respond_to: ServiceResponse<MenuItem, InventoryError>,
    ) {
        debug!("Processing create_menu_item request");
        self.transact(respond_to, |tx| {
            let item = tx.create_item(params)?;
            info!(item_id = item.id, quantity = item.quantity, "Menu item created");
            Ok(item)
        });
    }

    #[instrument(fields(item_id = %id), skip(self, respond_to))]
    fn handle_get_menu_item(
        &mut self,
        id: FoodId,
        respond_to: ServiceResponse<Option<MenuItem>, InventoryError>,
    ) {
        debug!("Processing get_menu_item request");
        self.transact(respond_to, |tx| Ok(tx.get_item(id)));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_menu_items(
        &mut self,
        respond_to: ServiceResponse<Vec<MenuItem>, InventoryError>,
    ) {
        debug!("Processing list_menu_items request");
        self.transact(respond_to, |tx| Ok(tx.list_items()));
    }

    #[instrument(fields(item_id = %id), skip(self, respond_to))]
    fn handle_update_menu_item(
        &mut self,
        id: FoodId,
        patch: MenuItemPatch,
        respond_to: ServiceResponse<MenuItem, InventoryError>,
    ) {
        debug!("Processing update_menu_item request");
        self.transact(respond_to, |tx| {
            let item = tx.update_item(id, patch)?;
            info!(quantity = item.quantity, "Menu item updated");
            Ok(item)
        });
    }

    #[instrument(fields(item_id = %id), skip(self, respond_to))]
    fn handle_delete_menu_item(&mut self, id: FoodId, respond_to: ServiceResponse<(), InventoryError>) {
        debug!("Processing delete_menu_item request");
        self.transact(respond_to, |tx| {
            tx.delete_item(id)?;
            info!("Menu item deleted");
            Ok(())
        });
    }

    #[instrument(skip(self, respond_to))]
    fn handle_add_cart_line(
        &mut self,
        user_id: UserId,
        food_id: FoodId,
        quantity: u32,
        respond_to: ServiceResponse<CartLine, CartError>,
    ) {
        debug!("Processing add_cart_line request");
        self.transact(respond_to, |tx| tx.add_line(user_id, food_id, quantity));
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_list_cart_lines(
        &mut self,
        user_id: UserId,
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    ) {
        debug!("Processing list_cart_lines request");
        self.transact(respond_to, |tx| Ok(tx.list_lines(user_id)));
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_clear_cart(&mut self, user_id: UserId, respond_to: ServiceResponse<usize, CartError>) {
        debug!("Processing clear_cart request");
        self.transact(respond_to, |tx| {
            let removed = tx.clear_lines(user_id);
            info!(removed, "Cart cleared");
            Ok(removed)
        });
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_place_order(
        &mut self,
        user_id: UserId,
        respond_to: ServiceResponse<OrderReceipt, OrderError>,
    ) {
        info!("Processing place_order request");
        self.transact(respond_to, |tx| order_engine::place_order(tx, user_id, Utc::now()));
    }

    #[instrument(fields(order_no = %order_no), skip(self, respond_to))]
    fn handle_get_order(
        &mut self,
        order_no: OrderNo,
        respond_to: ServiceResponse<Option<OrderSummary>, OrderError>,
    ) {
        debug!("Processing get_order request");
        self.transact(respond_to, |tx| Ok(tx.get_order(order_no)));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_orders_by_date_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        respond_to: ServiceResponse<Vec<OrderSummary>, OrderError>,
    ) {
        debug!("Processing list_orders_by_date_range request");
        self.transact(respond_to, |tx| {
            let orders = tx.list_orders_by_date_range(start, end);
            info!(count = orders.len(), "Orders listed");
            Ok(orders)
        });
    }
}

/// Sends a response, logging when the caller no longer listens. Returns
/// whether the response was delivered.
fn deliver<T, E>(respond_to: ServiceResponse<T, E>, result: Result<T, E>) -> bool {
    let committed = result.is_ok();
    if respond_to.send(result).is_err() {
        if committed {
            warn!("Caller gone after commit, result applied but not delivered");
        } else {
            debug!("Caller gone, error response discarded");
        }
        return false;
    }
    true
}
