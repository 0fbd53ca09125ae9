use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FoodId, OrderNo, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

/// A confirmed customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_no: OrderNo,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub total_price: Decimal,
}

/// One line of a confirmed order, frozen at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_no: OrderNo,
    pub food_id: FoodId,
    pub food_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Result of a successful order placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_no: OrderNo,
    pub total_price: Decimal,
}

/// An order grouped with its lines, as returned by ledger reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_renders_order_no_and_decimal_total() {
        let receipt = OrderReceipt {
            order_no: 12,
            total_price: Decimal::new(1700, 2),
        };

        let body = serde_json::to_value(&receipt).unwrap();

        assert_eq!(body["order_no"], 12);
        assert_eq!(body["total_price"], "17.00");
    }
}
