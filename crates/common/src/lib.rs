//! Shared types for the ordering backend.
//!
//! Identifiers, money and the small status enums that every layer agrees on.

pub mod money;
pub mod status;
pub mod types;

pub use money::Money;
pub use status::{CartStatus, Category, OrderStatus, ParseStatusError, Role};
pub use types::{Actor, CartId, CartLineId, MenuId, OrderId, UserId};
