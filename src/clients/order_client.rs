use chrono::{DateTime, Utc};

use super::StoreHandle;
use crate::domain::{OrderNo, OrderReceipt, OrderSummary, UserId};
use crate::error::OrderError;

/// Client for placing orders and reading the order ledger.
///
/// `place_order` is the entry point of the cart-to-order transaction: the
/// store service runs the whole conversion as one transaction and this client
/// only sees the receipt or a typed [`OrderError`].
#[derive(Clone)]
pub struct OrderClient {
    store: StoreHandle,
}

impl OrderClient {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }
}

client_method!(OrderClient => fn place_order(user_id: UserId) -> OrderReceipt as StoreRequest::PlaceOrder, Error = OrderError);
client_method!(OrderClient => fn get_order(order_no: OrderNo) -> Option<OrderSummary> as StoreRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn list_orders_by_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<OrderSummary> as StoreRequest::ListOrdersByDateRange, Error = OrderError);
