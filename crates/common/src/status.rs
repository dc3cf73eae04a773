//! Status enums persisted as lowercase text columns.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a stored status string does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the value as stored in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseStatusError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// The lifecycle of a cart.
///
/// ```text
/// Open ──► CheckedOut
/// ```
///
/// There is no way back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Lines may be added, changed and removed.
    #[default]
    Open,

    /// Frozen into an order (terminal state).
    CheckedOut,
}

impl CartStatus {
    /// Returns true if lines can be modified in this state.
    pub fn can_modify_lines(&self) -> bool {
        matches!(self, CartStatus::Open)
    }

    /// Returns true if the cart can be checked out in this state.
    pub fn can_checkout(&self) -> bool {
        matches!(self, CartStatus::Open)
    }
}

text_enum!(CartStatus, "cart status", {
    Open => "open",
    CheckedOut => "checked_out",
});

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

text_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Paid => "paid",
    Cancelled => "cancelled",
});

/// Role granted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

text_enum!(Role, "role", {
    Customer => "customer",
    Admin => "admin",
});

/// Menu category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Drink,
}

text_enum!(Category, "category", {
    Food => "food",
    Drink => "drink",
});
