//! Converts a user's cart into a confirmed order.
//!
//! [`place_order`] works against any store exposing the cart, inventory and
//! ledger views; in the running system that is the store service's
//! [`Transaction`](crate::store::Transaction). The function itself never
//! commits. The caller commits on `Ok` and drops or rolls back the transaction
//! on `Err`, so a failure at any step leaves no trace.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::domain::{CartLine, FoodId, Order, OrderLine, OrderReceipt, OrderStatus, UserId};
use crate::error::OrderError;
use crate::store::{CartStore, InventoryStore, OrderLedger};

#[instrument(skip(store, placed_at))]
pub fn place_order<S>(store: &mut S, user_id: UserId, placed_at: DateTime<Utc>) -> Result<OrderReceipt, OrderError>
where
    S: CartStore + InventoryStore + OrderLedger,
{
    let lines = store.list_lines(user_id);
    if lines.is_empty() {
        warn!("Cart is empty");
        return Err(OrderError::EmptyCart(user_id));
    }

    let requested = requested_per_item(&lines);
    for (&item_id, &quantity) in &requested {
        let available = store.get_item(item_id).map_or(0, |item| item.quantity);
        if quantity > available {
            warn!(item_id, requested = quantity, available, "Insufficient stock");
            return Err(OrderError::InsufficientStock {
                item_id,
                requested: quantity,
                available,
            });
        }
    }

    let order_no = store.next_order_number()?;
    let total_price: Decimal = lines.iter().map(|line| line.total_price).sum();

    let order = Order {
        order_no,
        user_id,
        status: OrderStatus::Completed,
        created_at: placed_at,
        total_price,
    };
    let order_lines = lines
        .iter()
        .map(|line| OrderLine {
            order_no,
            food_id: line.food_id,
            food_name: line.food_name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        })
        .collect();
    store.append_order(order, order_lines)?;

    for (item_id, quantity) in requested {
        let remaining = store.decrement_stock(item_id, quantity)?;
        debug!(item_id, quantity, remaining, "Stock reserved for order");
    }

    let cleared = store.clear_lines(user_id);
    info!(order_no, %total_price, lines = cleared, "Order staged");

    Ok(OrderReceipt { order_no, total_price })
}

/// Sums quantities of lines that reference the same item.
fn requested_per_item(lines: &[CartLine]) -> BTreeMap<FoodId, u32> {
    let mut requested = BTreeMap::new();
    for line in lines {
        let total = requested.entry(line.food_id).or_insert(0u32);
        *total = total.saturating_add(line.quantity);
    }
    requested
}
