use rust_decimal::Decimal;
use tracing::debug;

use super::Transaction;
use crate::domain::{FoodId, MenuItem, MenuItemCreate, MenuItemPatch};
use crate::error::InventoryError;

/// Stock view used while placing an order.
pub trait InventoryStore {
    fn get_item(&self, item_id: FoodId) -> Option<MenuItem>;

    /// Removes `amount` units and returns the remaining stock.
    fn decrement_stock(&mut self, item_id: FoodId, amount: u32) -> Result<u32, InventoryError>;
}

impl InventoryStore for Transaction<'_> {
    fn get_item(&self, item_id: FoodId) -> Option<MenuItem> {
        self.menu_item(item_id).cloned()
    }

    fn decrement_stock(&mut self, item_id: FoodId, amount: u32) -> Result<u32, InventoryError> {
        let mut item = self
            .menu_item(item_id)
            .cloned()
            .ok_or(InventoryError::NotFound(item_id))?;

        let remaining = item
            .quantity
            .checked_sub(amount)
            .ok_or(InventoryError::InsufficientStock {
                item_id,
                requested: amount,
                available: item.quantity,
            })?;

        item.quantity = remaining;
        self.put_menu_item(item);
        debug!(item_id, amount, remaining, "Stock decremented");
        Ok(remaining)
    }
}

// Menu management. These run on the same transaction type as order placement,
// so stock edits are serialized with it.
impl Transaction<'_> {
    pub fn create_item(&mut self, params: MenuItemCreate) -> Result<MenuItem, InventoryError> {
        validate_fields(&params.name, params.price)?;
        self.ensure_unique_name(&params.name, None)?;

        let sequences = self.sequences();
        sequences.food_id += 1;
        let item = MenuItem::from_create(sequences.food_id, params);
        self.put_menu_item(item.clone());
        Ok(item)
    }

    pub fn update_item(&mut self, item_id: FoodId, patch: MenuItemPatch) -> Result<MenuItem, InventoryError> {
        let mut item = self
            .menu_item(item_id)
            .cloned()
            .ok_or(InventoryError::NotFound(item_id))?;

        if let Some(name) = &patch.name {
            self.ensure_unique_name(name, Some(item_id))?;
        }
        item.apply_patch(patch);
        validate_fields(&item.name, item.price)?;

        self.put_menu_item(item.clone());
        Ok(item)
    }

    pub fn delete_item(&mut self, item_id: FoodId) -> Result<(), InventoryError> {
        if self.menu_item(item_id).is_none() {
            return Err(InventoryError::NotFound(item_id));
        }
        self.remove_menu_item(item_id);
        Ok(())
    }

    pub fn list_items(&self) -> Vec<MenuItem> {
        self.menu_items()
    }

    fn ensure_unique_name(&self, name: &str, except: Option<FoodId>) -> Result<(), InventoryError> {
        let taken = self
            .menu_items()
            .iter()
            .any(|item| item.name == name && Some(item.id) != except);
        if taken {
            return Err(InventoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

fn validate_fields(name: &str, price: Decimal) -> Result<(), InventoryError> {
    if name.trim().is_empty() {
        return Err(InventoryError::Invalid("name must not be empty".to_string()));
    }
    if price.is_sign_negative() {
        return Err(InventoryError::Invalid(format!("price must be non-negative, got {price}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Database, OrderNumbering};

    fn item(name: &str, quantity: u32) -> MenuItemCreate {
        MenuItemCreate::new(name, Decimal::new(850, 2), quantity)
    }

    #[test]
    fn decrement_rejects_more_than_available() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let mut tx = db.begin();
        let id = tx.create_item(item("Satay", 2)).unwrap().id;

        let err = tx.decrement_stock(id, 3).unwrap_err();

        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                item_id: id,
                requested: 3,
                available: 2
            }
        );
        assert_eq!(tx.get_item(id).unwrap().quantity, 2);
    }

    #[test]
    fn decrement_unknown_item_is_not_found() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let mut tx = db.begin();

        assert_eq!(tx.decrement_stock(99, 1), Err(InventoryError::NotFound(99)));
    }

    #[test]
    fn names_stay_unique_across_create_and_rename() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let mut tx = db.begin();
        tx.create_item(item("Satay", 2)).unwrap();
        let rice = tx.create_item(item("Rice", 20)).unwrap();

        assert_eq!(
            tx.create_item(item("Satay", 1)),
            Err(InventoryError::DuplicateName("Satay".to_string()))
        );

        let rename = MenuItemPatch {
            name: Some("Satay".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tx.update_item(rice.id, rename),
            Err(InventoryError::DuplicateName(_))
        ));

        // Renaming an item to its own name is not a conflict.
        let same = MenuItemPatch {
            name: Some("Rice".to_string()),
            quantity: Some(5),
            ..Default::default()
        };
        assert_eq!(tx.update_item(rice.id, same).unwrap().quantity, 5);
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let mut tx = db.begin();

        let result = tx.create_item(MenuItemCreate::new("Refund", Decimal::new(-100, 2), 1));

        assert!(matches!(result, Err(InventoryError::Invalid(_))));
        assert!(tx.list_items().is_empty());
    }

    #[test]
    fn deleted_items_disappear_from_listing() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let mut tx = db.begin();
        let satay = tx.create_item(item("Satay", 2)).unwrap();
        tx.create_item(item("Rice", 20)).unwrap();

        tx.delete_item(satay.id).unwrap();

        let names: Vec<_> = tx.list_items().into_iter().map(|item| item.name).collect();
        assert_eq!(names, vec!["Rice".to_string()]);
        assert_eq!(tx.delete_item(satay.id), Err(InventoryError::NotFound(satay.id)));
    }
}
