//! Persistence boundary for the ordering backend.
//!
//! Every multi-step mutation runs inside one [`UnitOfWork`] obtained from
//! [`Store::begin`]. Dropping a unit of work without committing rolls it back.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod records;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use query::{CartQuery, OrderQuery, UserQuery};
pub use records::{
    Cart, CartDetail, CartLine, LineDetail, MenuItem, MenuPatch, NewCartLine, NewMenuItem,
    NewOrder, NewUser, Order, OrderDetail, User, UserPatch, UserSummary,
};
pub use store::{Store, UnitOfWork};

/// Unique index guarding one line per (cart, menu) pair.
pub const CART_LINE_UNIQUE: &str = "cart_lines_cart_menu_key";

/// Unique index on live user emails.
pub const USER_EMAIL_UNIQUE: &str = "users_email_key";

/// Unique constraint making an order the only one for its cart.
pub const ORDER_CART_UNIQUE: &str = "orders_cart_id_key";
