use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FoodId;

/// An item on the restaurant menu together with its available stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: FoodId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub is_active: bool,
    pub image_url: Option<String>,
}

/// Payload for adding a new item to the menu.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl MenuItemCreate {
    /// Active item with no description, category or image.
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            price,
            quantity,
            is_active: true,
            image_url: None,
        }
    }
}

/// Partial update of a menu item. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}

impl MenuItem {
    pub fn from_create(id: FoodId, params: MenuItemCreate) -> Self {
        Self {
            id,
            name: params.name,
            description: params.description,
            category: params.category,
            price: params.price,
            quantity: params.quantity,
            is_active: params.is_active,
            image_url: params.image_url,
        }
    }

    /// Applies every field present in `patch`, leaving the rest untouched.
    pub fn apply_patch(&mut self, patch: MenuItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut item = MenuItem::from_create(1, MenuItemCreate::new("Pad Thai", Decimal::new(1250, 2), 8));

        item.apply_patch(MenuItemPatch {
            quantity: Some(3),
            category: Some("Noodles".to_string()),
            ..Default::default()
        });

        assert_eq!(item.name, "Pad Thai");
        assert_eq!(item.price, Decimal::new(1250, 2));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.category.as_deref(), Some("Noodles"));
        assert!(item.is_active);
    }
}
