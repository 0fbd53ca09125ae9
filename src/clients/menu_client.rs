use super::StoreHandle;
use crate::domain::{FoodId, MenuItem, MenuItemCreate, MenuItemPatch};
use crate::error::InventoryError;

/// Menu management on the store service.
#[derive(Clone)]
pub struct MenuClient {
    store: StoreHandle,
}

impl MenuClient {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }
}

client_method!(MenuClient => fn create_menu_item(params: MenuItemCreate) -> MenuItem as StoreRequest::CreateMenuItem, Error = InventoryError);
client_method!(MenuClient => fn get_menu_item(id: FoodId) -> Option<MenuItem> as StoreRequest::GetMenuItem, Error = InventoryError);
client_method!(MenuClient => fn list_menu_items() -> Vec<MenuItem> as StoreRequest::ListMenuItems, Error = InventoryError);
client_method!(MenuClient => fn update_menu_item(id: FoodId, patch: MenuItemPatch) -> MenuItem as StoreRequest::UpdateMenuItem, Error = InventoryError);
client_method!(MenuClient => fn delete_menu_item(id: FoodId) -> () as StoreRequest::DeleteMenuItem, Error = InventoryError);
