use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::domain::{
    CartLine, FoodId, MenuItem, MenuItemCreate, MenuItemPatch, OrderNo, OrderReceipt, OrderSummary, UserId,
};
use crate::error::{CartError, InventoryError, OrderError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the store service. Each variant carries its parameters
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum StoreRequest {
    // Inventory
    CreateMenuItem {
        params: MenuItemCreate,
        respond_to: ServiceResponse<MenuItem, InventoryError>,
    },
    GetMenuItem {
        id: FoodId,
        respond_to: ServiceResponse<Option<MenuItem>, InventoryError>,
    },
    ListMenuItems {
        respond_to: ServiceResponse<Vec<MenuItem>, InventoryError>,
    },
    UpdateMenuItem {
        id: FoodId,
        patch: MenuItemPatch,
        respond_to: ServiceResponse<MenuItem, InventoryError>,
    },
    DeleteMenuItem {
        id: FoodId,
        respond_to: ServiceResponse<(), InventoryError>,
    },

    // Cart
    AddCartLine {
        user_id: UserId,
        food_id: FoodId,
        quantity: u32,
        respond_to: ServiceResponse<CartLine, CartError>,
    },
    ListCartLines {
        user_id: UserId,
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    },
    ClearCart {
        user_id: UserId,
        respond_to: ServiceResponse<usize, CartError>,
    },

    // Orders
    PlaceOrder {
        user_id: UserId,
        respond_to: ServiceResponse<OrderReceipt, OrderError>,
    },
    GetOrder {
        order_no: OrderNo,
        respond_to: ServiceResponse<Option<OrderSummary>, OrderError>,
    },
    ListOrdersByDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        respond_to: ServiceResponse<Vec<OrderSummary>, OrderError>,
    },

    Shutdown,
}
