//! Structural validation of incoming commands.
//!
//! A [`Validator`] is built once at start-up and shared by reference; it holds
//! no global state.

use common::Money;
use store::{MenuPatch, NewMenuItem, NewUser, UserPatch};
use thiserror::Error;

use crate::cart::{CreateCart, UpdateCartLine};

/// Longest accepted name for users and menu items, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Highest accepted menu price, in cents.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// A field failed a structural check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Limits applied by the [`Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest quantity a single line request may carry.
    pub max_line_quantity: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_quantity: 1000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: Limits,
}

impl Validator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Checks the per-line quantities of a cart request.
    ///
    /// The limit applies to each line after repeated menu ids are merged.
    /// An empty item list is left to the cart service, which reports it as
    /// its own error kind.
    pub fn create_cart(&self, cmd: &CreateCart) -> Result<(), ValidationError> {
        if cmd.items.iter().any(|item| item.qty == 0) {
            return Err(ValidationError::new("qty", "must be greater than zero"));
        }
        for item in cmd.coalesced_items() {
            self.check_quantity(u64::from(item.qty))?;
        }
        Ok(())
    }

    pub fn update_cart_line(&self, cmd: &UpdateCartLine) -> Result<(), ValidationError> {
        self.check_quantity(u64::from(cmd.delta.unsigned_abs()))
    }

    pub fn new_user(&self, user: &NewUser) -> Result<(), ValidationError> {
        check_name(&user.name)?;
        check_email(&user.email)?;
        check_phone(&user.phone)?;
        check_address(&user.address)
    }

    pub fn user_patch(&self, patch: &UserPatch) -> Result<(), ValidationError> {
        if patch.is_empty() {
            return Err(ValidationError::new("patch", "at least one field is required"));
        }
        if let Some(name) = &patch.name {
            check_name(name)?;
        }
        if let Some(phone) = &patch.phone {
            check_phone(phone)?;
        }
        if let Some(address) = &patch.address {
            check_address(address)?;
        }
        Ok(())
    }

    pub fn new_menu(&self, menu: &NewMenuItem) -> Result<(), ValidationError> {
        check_name(&menu.name)?;
        if menu.stock == 0 {
            return Err(ValidationError::new("stock", "must be greater than zero"));
        }
        check_price(menu.price)?;
        if menu.description.trim().is_empty() {
            return Err(ValidationError::new("description", "is required"));
        }
        Ok(())
    }

    pub fn menu_patch(&self, patch: &MenuPatch) -> Result<(), ValidationError> {
        if patch.is_empty() {
            return Err(ValidationError::new("patch", "at least one field is required"));
        }
        if let Some(name) = &patch.name {
            check_name(name)?;
        }
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        Ok(())
    }

    fn check_quantity(&self, qty: u64) -> Result<(), ValidationError> {
        if qty > u64::from(self.limits.max_line_quantity) {
            return Err(ValidationError::new(
                "qty",
                format!("must not exceed {}", self.limits.max_line_quantity),
            ));
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::new("name", "is required"));
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

fn check_price(price: Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::new("price", "must not be negative"));
    }
    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::new(
            "price",
            format!("must not exceed {}", Money::from_cents(MAX_PRICE_CENTS)),
        ));
    }
    Ok(())
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone", "must be numeric"));
    }
    Ok(())
}

fn check_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::new("address", "is required"));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    let valid = email.len() <= MAX_NAME_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            });
    if !valid {
        return Err(ValidationError::new("email", "must be a valid address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use common::{CartId, Category, MenuId, Money, Role, UserId};

    fn user() -> NewUser {
        NewUser {
            name: "Budi".into(),
            email: "budi@example.com".into(),
            phone: "0812345".into(),
            address: "Jl. Merdeka 1".into(),
            role: Role::Customer,
        }
    }

    #[test]
    fn rejects_zero_and_oversized_line_quantities() {
        let validator = Validator::new(Limits {
            max_line_quantity: 10,
        });
        let zero = CreateCart::new(UserId::new(1), vec![CartItem::new(MenuId::new(1), 0)]);
        assert_eq!(validator.create_cart(&zero).unwrap_err().field, "qty");

        let big = CreateCart::new(UserId::new(1), vec![CartItem::new(MenuId::new(1), 11)]);
        assert!(validator.create_cart(&big).is_err());

        let removal = UpdateCartLine::new(CartId::new(1), MenuId::new(1), -11);
        assert!(validator.update_cart_line(&removal).is_err());

        let ok = UpdateCartLine::new(CartId::new(1), MenuId::new(1), -10);
        assert!(validator.update_cart_line(&ok).is_ok());
    }

    #[test]
    fn repeated_menu_ids_are_limited_after_merging() {
        let validator = Validator::default();
        let split = CreateCart::new(
            UserId::new(1),
            vec![
                CartItem::new(MenuId::new(1), 1000),
                CartItem::new(MenuId::new(1), 1000),
            ],
        );
        assert_eq!(validator.create_cart(&split).unwrap_err().field, "qty");

        let distinct = CreateCart::new(
            UserId::new(1),
            vec![
                CartItem::new(MenuId::new(1), 1000),
                CartItem::new(MenuId::new(2), 1000),
            ],
        );
        assert!(validator.create_cart(&distinct).is_ok());
    }

    #[test]
    fn empty_cart_is_left_to_the_service() {
        let validator = Validator::default();
        let cmd = CreateCart::new(UserId::new(1), vec![]);
        assert!(validator.create_cart(&cmd).is_ok());
    }

    #[test]
    fn validates_user_fields() {
        let validator = Validator::default();
        assert!(validator.new_user(&user()).is_ok());

        let mut bad = user();
        bad.email = "budi.example.com".into();
        assert_eq!(validator.new_user(&bad).unwrap_err().field, "email");

        let mut bad = user();
        bad.phone = "08-12".into();
        assert_eq!(validator.new_user(&bad).unwrap_err().field, "phone");

        let mut bad = user();
        bad.name = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(validator.new_user(&bad).unwrap_err().field, "name");
    }

    #[test]
    fn validates_menu_and_patch() {
        let validator = Validator::default();
        let menu = NewMenuItem {
            name: "Es Teh".into(),
            stock: 0,
            price: Money::from_cents(300),
            category: Category::Drink,
            description: "iced tea".into(),
        };
        assert_eq!(validator.new_menu(&menu).unwrap_err().field, "stock");

        assert!(validator.menu_patch(&MenuPatch::default()).is_err());
        let patch = MenuPatch {
            price: Some(Money::from_cents(-1)),
            ..Default::default()
        };
        assert_eq!(validator.menu_patch(&patch).unwrap_err().field, "price");
    }

    #[test]
    fn price_has_an_upper_bound() {
        let validator = Validator::default();
        let mut menu = NewMenuItem {
            name: "Nasi Goreng".into(),
            stock: 10,
            price: Money::from_cents(MAX_PRICE_CENTS),
            category: Category::Food,
            description: "fried rice".into(),
        };
        assert!(validator.new_menu(&menu).is_ok());

        menu.price = Money::from_cents(i64::MAX / 2);
        assert_eq!(validator.new_menu(&menu).unwrap_err().field, "price");

        let patch = MenuPatch {
            price: Some(Money::from_cents(MAX_PRICE_CENTS + 1)),
            ..Default::default()
        };
        assert_eq!(validator.menu_patch(&patch).unwrap_err().field, "price");
    }

    #[test]
    fn validates_user_patch() {
        let validator = Validator::default();
        assert_eq!(
            validator.user_patch(&UserPatch::default()).unwrap_err().field,
            "patch"
        );

        let patch = UserPatch {
            phone: Some("0812".into()),
            ..Default::default()
        };
        assert!(validator.user_patch(&patch).is_ok());

        let patch = UserPatch {
            phone: Some("+62 812".into()),
            ..Default::default()
        };
        assert_eq!(validator.user_patch(&patch).unwrap_err().field, "phone");

        let patch = UserPatch {
            address: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(validator.user_patch(&patch).unwrap_err().field, "address");
    }
}
