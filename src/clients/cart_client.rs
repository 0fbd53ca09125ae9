use super::StoreHandle;
use crate::domain::{CartLine, FoodId, UserId};
use crate::error::CartError;

/// Client for a user's cart.
#[derive(Clone)]
pub struct CartClient {
    store: StoreHandle,
}

impl CartClient {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }
}

client_method!(CartClient => fn add_line(user_id: UserId, food_id: FoodId, quantity: u32) -> CartLine as StoreRequest::AddCartLine, Error = CartError);
client_method!(CartClient => fn list_lines(user_id: UserId) -> Vec<CartLine> as StoreRequest::ListCartLines, Error = CartError);
client_method!(CartClient => fn clear(user_id: UserId) -> usize as StoreRequest::ClearCart, Error = CartError);
