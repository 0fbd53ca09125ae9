//! Restaurant ordering back end: menu inventory, per-user carts, and the
//! transaction that turns a cart into a numbered order.
//!
//! The menu, cart and order tables belong to a single
//! [`StoreService`](actors::StoreService) that runs every request in its own
//! [`Transaction`](store::Transaction). Users and feedback live in generic
//! [`ResourceActor`](actor_framework::ResourceActor)s. [`OrderSystem`](app_system::OrderSystem)
//! starts all of them and hands out the clients.

pub mod actor_framework;
pub mod actors;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod error;
pub mod feedback_actor;
pub mod messages;
pub mod order_engine;
pub mod store;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
