//! Append-only customer feedback log.

pub mod entity;
pub mod error;

pub use error::*;
