//! Row records and the joined views built from them.

use chrono::{DateTime, Utc};
use common::{
    CartId, CartLineId, CartStatus, Category, MenuId, Money, OrderId, OrderStatus, Role, UserId,
};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
}

/// Partial update of a user's profile. Email and role are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none()
    }

    /// Applies every present field to `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            user.address = address.clone();
        }
    }
}

/// A catalog entry. Cart logic only ever touches `stock`, and only through
/// the conditional reserve/release statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuId,
    pub name: String,
    pub stock: u32,
    pub price: Money,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub stock: u32,
    pub price: Money,
    pub category: Category,
    pub description: String,
}

/// Partial update of a menu item. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPatch {
    pub name: Option<String>,
    pub stock: Option<u32>,
    pub price: Option<Money>,
    pub category: Option<Category>,
    pub description: Option<String>,
}

impl MenuPatch {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }

    /// Applies every present field to `item`.
    pub fn apply(&self, item: &mut MenuItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(stock) = self.stock {
            item.stock = stock;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
    }
}

/// A cart row. `amount` is derived from the cart's lines and rewritten in
/// the same transaction as every line change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub status: CartStatus,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One (cart, menu) pairing with the price captured when it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub cart_id: CartId,
    pub menu_id: MenuId,
    pub unit_price: Money,
    pub qty: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// Returns `unit_price * qty`, or `None` on overflow.
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price.checked_multiply(self.qty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    pub cart_id: CartId,
    pub menu_id: MenuId,
    pub unit_price: Money,
    pub qty: u32,
}

/// An order materialized from a checked-out cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub cart_id: CartId,
    pub user_id: UserId,
    pub amount_pay: Money,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub amount_pay: Money,
    pub order_date: DateTime<Utc>,
}

/// The user fields shown next to a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A cart line joined with its menu name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDetail {
    pub menu_id: MenuId,
    pub name: String,
    pub qty: u32,
    pub unit_price: Money,
}

/// A cart with its owner and lines joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDetail {
    pub cart: Cart,
    pub user: UserSummary,
    pub lines: Vec<LineDetail>,
}

impl CartDetail {
    /// Sum of `unit_price * qty` over the joined lines, or `None` on overflow.
    pub fn lines_total(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(), |acc, l| {
            acc.checked_add(l.unit_price.checked_multiply(l.qty)?)
        })
    }

    /// Returns the joined line for `menu_id`, if any.
    pub fn line(&self, menu_id: MenuId) -> Option<&LineDetail> {
        self.lines.iter().find(|l| l.menu_id == menu_id)
    }
}

/// An order with its owner and the frozen cart lines joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub user: UserSummary,
    pub lines: Vec<LineDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item() -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: MenuId::new(1),
            name: "Nasi Goreng".to_string(),
            stock: 10,
            price: Money::from_cents(500),
            category: Category::Food,
            description: "fried rice".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut item = menu_item();
        let before = item.clone();
        let patch = MenuPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut item);
        assert_eq!(item, before);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut item = menu_item();
        let patch = MenuPatch {
            price: Some(Money::from_cents(750)),
            category: Some(Category::Drink),
            ..Default::default()
        };
        patch.apply(&mut item);
        assert_eq!(item.price, Money::from_cents(750));
        assert_eq!(item.category, Category::Drink);
        assert_eq!(item.name, "Nasi Goreng");
        assert_eq!(item.stock, 10);
    }

    #[test]
    fn user_patch_keeps_email_and_role() {
        let now = Utc::now();
        let mut user = User {
            id: UserId::new(1),
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            phone: "0812".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            role: Role::Customer,
            created_at: now,
            updated_at: now,
        };
        let patch = UserPatch {
            address: Some("Jl. Sudirman 5".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut user);
        assert_eq!(user.address, "Jl. Sudirman 5");
        assert_eq!(user.name, "Budi");
        assert_eq!(user.email, "budi@example.com");
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn line_subtotal_uses_captured_price() {
        let now = Utc::now();
        let line = CartLine {
            id: CartLineId::new(1),
            cart_id: CartId::new(1),
            menu_id: MenuId::new(1),
            unit_price: Money::from_cents(500),
            qty: 3,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(line.subtotal(), Some(Money::from_cents(1500)));
    }
}
