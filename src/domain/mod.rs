pub mod menu;
pub mod cart;
pub mod order;
pub mod user;
pub mod feedback;

pub use menu::*;
pub use cart::*;
pub use order::*;
pub use user::*;
pub use feedback::*;

/// Identifier of a menu item.
pub type FoodId = u64;
/// Identifier of a registered user.
pub type UserId = u64;
/// Externally visible order number.
pub type OrderNo = u64;
/// Identifier of a single cart line.
pub type CartLineId = u64;
/// Identifier of a feedback entry.
pub type FeedbackId = u64;
