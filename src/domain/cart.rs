use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CartLineId, FoodId, MenuItem, UserId};

/// A pending selection in a user's cart.
///
/// Name and unit price are copied from the menu item when the line is added,
/// so later menu edits do not change what the user saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub food_id: FoodId,
    pub food_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
}

impl CartLine {
    pub fn snapshot(id: CartLineId, user_id: UserId, item: &MenuItem, quantity: u32) -> Self {
        Self {
            id,
            user_id,
            food_id: item.id,
            food_name: item.name.clone(),
            unit_price: item.price,
            quantity,
            total_price: item.price * Decimal::from(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MenuItemCreate;

    #[test]
    fn snapshot_computes_line_total() {
        let item = MenuItem::from_create(7, MenuItemCreate::new("Spring Rolls", Decimal::new(350, 2), 10));
        let line = CartLine::snapshot(1, 42, &item, 2);

        assert_eq!(line.food_name, "Spring Rolls");
        assert_eq!(line.unit_price, Decimal::new(350, 2));
        assert_eq!(line.total_price, Decimal::new(700, 2));
    }
}
