use tracing::debug;

use super::Transaction;
use crate::domain::{CartLine, FoodId, UserId};
use crate::error::CartError;

/// Per-user pending selections.
pub trait CartStore {
    /// Adds a line after a best-effort stock check. Stock is checked again
    /// when the order is placed.
    fn add_line(&mut self, user_id: UserId, food_id: FoodId, quantity: u32) -> Result<CartLine, CartError>;

    fn list_lines(&self, user_id: UserId) -> Vec<CartLine>;

    /// Removes every line of the user's cart, returning how many there were.
    fn clear_lines(&mut self, user_id: UserId) -> usize;
}

impl CartStore for Transaction<'_> {
    fn add_line(&mut self, user_id: UserId, food_id: FoodId, quantity: u32) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let item = self
            .menu_item(food_id)
            .cloned()
            .ok_or(CartError::ItemNotFound(food_id))?;
        if !item.is_active {
            return Err(CartError::ItemUnavailable(food_id));
        }
        if quantity > item.quantity {
            return Err(CartError::InsufficientStock {
                item_id: food_id,
                requested: quantity,
                available: item.quantity,
            });
        }

        let sequences = self.sequences();
        sequences.cart_line_id += 1;
        let line = CartLine::snapshot(sequences.cart_line_id, user_id, &item, quantity);

        let mut lines = self.cart(user_id).to_vec();
        lines.push(line.clone());
        self.set_cart(user_id, lines);
        debug!(user_id, food_id, quantity, line_id = line.id, "Cart line added");
        Ok(line)
    }

    fn list_lines(&self, user_id: UserId) -> Vec<CartLine> {
        self.cart(user_id).to_vec()
    }

    fn clear_lines(&mut self, user_id: UserId) -> usize {
        let removed = self.cart(user_id).len();
        if removed > 0 {
            self.set_cart(user_id, Vec::new());
        }
        removed
    }
}
