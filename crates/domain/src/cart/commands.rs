//! Cart commands.

use common::{CartId, MenuId, UserId};
use serde::{Deserialize, Serialize};

/// One requested (menu item, quantity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_id: MenuId,
    pub qty: u32,
}

impl CartItem {
    pub fn new(menu_id: MenuId, qty: u32) -> Self {
        Self { menu_id, qty }
    }
}

/// Command to open a cart with an initial set of lines.
#[derive(Debug, Clone)]
pub struct CreateCart {
    /// The user who will own the cart.
    pub user_id: UserId,

    /// Requested lines. Must not be empty.
    pub items: Vec<CartItem>,
}

impl CreateCart {
    pub fn new(user_id: UserId, items: Vec<CartItem>) -> Self {
        Self { user_id, items }
    }

    /// Returns the items with duplicate menu ids merged, in first-seen order.
    pub fn coalesced_items(&self) -> Vec<CartItem> {
        let mut merged: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match merged.iter_mut().find(|m| m.menu_id == item.menu_id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
                None => merged.push(*item),
            }
        }
        merged
    }
}

/// Command to adjust one line of a cart by a signed quantity delta.
#[derive(Debug, Clone, Copy)]
pub struct UpdateCartLine {
    pub cart_id: CartId,
    pub menu_id: MenuId,

    /// Positive adds units, negative removes them, zero only refreshes the total.
    pub delta: i32,
}

impl UpdateCartLine {
    pub fn new(cart_id: CartId, menu_id: MenuId, delta: i32) -> Self {
        Self {
            cart_id,
            menu_id,
            delta,
        }
    }
}

/// Command to freeze a cart into an order.
#[derive(Debug, Clone, Copy)]
pub struct Checkout {
    pub cart_id: CartId,
}

impl Checkout {
    pub fn new(cart_id: CartId) -> Self {
        Self { cart_id }
    }
}
