//! Result window for listings.

use serde::Deserialize;
use store::{CartQuery, OrderQuery, UserQuery};

/// Limit and offset of a listing. Absent fields leave the listing unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Bounds the limit by `max`, defaulting to `max` when absent.
    pub fn clamp(self, max: usize) -> Self {
        Self {
            limit: Some(self.limit.map_or(max, |l| l.min(max))),
            offset: self.offset,
        }
    }

    pub(crate) fn apply(self, mut query: CartQuery) -> CartQuery {
        query.limit = self.limit;
        query.offset = self.offset;
        query
    }

    pub(crate) fn apply_orders(self, mut query: OrderQuery) -> OrderQuery {
        query.limit = self.limit;
        query.offset = self.offset;
        query
    }

    pub(crate) fn apply_users(self, mut query: UserQuery) -> UserQuery {
        query.limit = self.limit;
        query.offset = self.offset;
        query
    }
}
