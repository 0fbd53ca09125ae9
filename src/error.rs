use thiserror::Error;

use crate::domain::{FoodId, UserId};

/// Opaque persistence or communication failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    #[error("Menu item not found: {0}")]
    NotFound(FoodId),
    #[error("Menu item already exists: {0}")]
    DuplicateName(String),
    #[error("Invalid menu item: {0}")]
    Invalid(String),
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: FoodId,
        requested: u32,
        available: u32,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    #[error("Menu item not found: {0}")]
    ItemNotFound(FoodId),
    #[error("Menu item is not available: {0}")]
    ItemUnavailable(FoodId),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: FoodId,
        requested: u32,
        available: u32,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors returned by order placement and ledger queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Cart is empty for user {0}. Cannot place order.")]
    EmptyCart(UserId),
    #[error("Not enough stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: FoodId,
        requested: u32,
        available: u32,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderError {
    /// HTTP status an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::EmptyCart(_) | OrderError::InsufficientStock { .. } => 400,
            OrderError::Storage(_) => 500,
        }
    }
}

impl From<InventoryError> for OrderError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock {
                item_id,
                requested,
                available,
            } => OrderError::InsufficientStock {
                item_id,
                requested,
                available,
            },
            InventoryError::NotFound(item_id) => OrderError::InsufficientStock {
                item_id,
                requested: 0,
                available: 0,
            },
            InventoryError::Storage(e) => OrderError::Storage(e),
            other => OrderError::Storage(StorageError::new(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_errors_map_to_http_status() {
        assert_eq!(OrderError::EmptyCart(1).status_code(), 400);
        let shortfall = OrderError::InsufficientStock {
            item_id: 1,
            requested: 3,
            available: 2,
        };
        assert_eq!(shortfall.status_code(), 400);
        assert_eq!(OrderError::Storage(StorageError::new("disk full")).status_code(), 500);
    }
}
