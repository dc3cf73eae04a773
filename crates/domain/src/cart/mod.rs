//! Cart engine: stock ledger, cart lifecycle and checkout.

mod checkout;
mod commands;
pub mod ledger;
mod service;

pub use checkout::CheckoutService;
pub use commands::{CartItem, Checkout, CreateCart, UpdateCartLine};
pub use service::CartService;
