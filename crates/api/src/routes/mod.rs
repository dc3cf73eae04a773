//! HTTP route handlers.

pub mod carts;
pub mod menus;
pub mod orders;
pub mod system;
pub mod users;
