use chrono::{DateTime, Utc};
use tracing::debug;

use super::{OrderNumbering, Transaction};
use crate::domain::{Order, OrderLine, OrderNo, OrderSummary};
use crate::error::StorageError;

/// Append-only record of confirmed orders.
pub trait OrderLedger {
    /// Allocates the next order number inside the current transaction.
    fn next_order_number(&mut self) -> Result<OrderNo, StorageError>;

    fn append_order(&mut self, order: Order, lines: Vec<OrderLine>) -> Result<(), StorageError>;

    fn get_order(&self, order_no: OrderNo) -> Option<OrderSummary>;

    /// Orders created within `[start, end]`, ascending by order number.
    fn list_orders_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<OrderSummary>;
}

impl OrderLedger for Transaction<'_> {
    fn next_order_number(&mut self) -> Result<OrderNo, StorageError> {
        let current_max = self.max_order_no();
        let numbering = self.numbering();
        let floor = match numbering {
            OrderNumbering::Dense => current_max,
            OrderNumbering::Sequence => current_max.max(self.sequences().order_no),
        };

        let next = floor
            .checked_add(1)
            .ok_or_else(|| StorageError::new("order number space exhausted"))?;
        if numbering == OrderNumbering::Sequence {
            self.sequences().order_no = next;
            self.persist_sequences()?;
        }
        debug!(order_no = next, ?numbering, "Order number allocated");
        Ok(next)
    }

    fn append_order(&mut self, order: Order, lines: Vec<OrderLine>) -> Result<(), StorageError> {
        let order_no = order.order_no;
        if self.order(order_no).is_some() {
            return Err(StorageError::new(format!("duplicate order number {order_no}")));
        }
        if let Some(line) = lines.iter().find(|line| line.order_no != order_no) {
            return Err(StorageError::new(format!(
                "order line for order {} appended to order {order_no}",
                line.order_no
            )));
        }

        self.stage_order(OrderSummary { order, lines });
        Ok(())
    }

    fn get_order(&self, order_no: OrderNo) -> Option<OrderSummary> {
        self.order(order_no).cloned()
    }

    fn list_orders_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<OrderSummary> {
        self.all_orders()
            .filter(|summary| summary.order.created_at >= start && summary.order.created_at <= end)
            .cloned()
            .collect()
    }
}
