//! Domain error types.

use common::{CartId, MenuId, UserId};
use store::{ORDER_CART_UNIQUE, StoreError};
use thiserror::Error;

use crate::validation::ValidationError;

/// Coarse classification of a [`DomainError`].
///
/// Callers at the boundary map a kind to a user-facing status exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    InsufficientStock,
    EmptyItems,
    AlreadyCheckedOut,
    Internal,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The cart does not exist or is not visible to the caller.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    #[error("Menu item not found: {0}")]
    MenuNotFound(MenuId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("User not found with email: {0}")]
    UserEmailNotFound(String),

    /// A cart was requested without any lines.
    #[error("Cart must contain at least one item")]
    EmptyItems,

    /// The conditional stock reservation affected no rows.
    #[error("Insufficient stock for menu item {menu_id}: requested {requested}")]
    InsufficientStock { menu_id: MenuId, requested: u32 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The cart has been checked out and is frozen.
    #[error("Cart {0} is already checked out")]
    AlreadyCheckedOut(CartId),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A unique key is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The menu item is still referenced by a cart line.
    #[error("Menu item {0} is referenced by a cart")]
    MenuInUse(MenuId),

    /// The user still owns a cart.
    #[error("User {0} is referenced by a cart")]
    UserInUse(UserId),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::CartNotFound(_)
            | DomainError::MenuNotFound(_)
            | DomainError::UserNotFound(_)
            | DomainError::UserEmailNotFound(_) => ErrorKind::NotFound,
            DomainError::EmptyItems => ErrorKind::EmptyItems,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            DomainError::InvalidQuantity(_) | DomainError::Validation(_) => {
                ErrorKind::InvalidInput
            }
            DomainError::AlreadyCheckedOut(_) => ErrorKind::AlreadyCheckedOut,
            DomainError::Conflict(_) | DomainError::MenuInUse(_) | DomainError::UserInUse(_) => {
                ErrorKind::Conflict
            }
            DomainError::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                DomainError::Conflict(format!("duplicate key violates {constraint}"))
            }
            other => DomainError::Store(other),
        }
    }
}

/// Maps a unique violation on the order's cart to a repeated checkout.
pub(crate) fn checkout_conflict(cart_id: CartId, err: StoreError) -> DomainError {
    match err {
        StoreError::UniqueViolation { ref constraint } if constraint == ORDER_CART_UNIQUE => {
            DomainError::AlreadyCheckedOut(cart_id)
        }
        other => other.into(),
    }
}
