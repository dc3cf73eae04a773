//! Cart and stock reconciliation engine.
//!
//! This crate provides:
//! - The stock ledger (conditional reserve and unconditional release)
//! - `CartService` for the open → checked-out cart lifecycle
//! - `CheckoutService` turning a cart into an order exactly once
//! - Catalog maintenance, user registration and command validation
//!
//! Every mutation runs in one [`store::UnitOfWork`]; errors roll it back.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod page;
pub mod users;
pub mod validation;

pub use cart::{
    CartItem, CartService, Checkout, CheckoutService, CreateCart, UpdateCartLine, ledger,
};
pub use catalog::CatalogService;
pub use error::{DomainError, ErrorKind};
pub use page::Page;
pub use users::UserService;
pub use validation::{Limits, ValidationError, Validator};
