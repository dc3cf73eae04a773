use common::{CartId, CartStatus, UserId};

/// Builder for cart listings.
///
/// Unbounded listings are allowed here; callers facing the network clamp
/// `limit` before building the query.
#[derive(Debug, Clone, Default)]
pub struct CartQuery {
    /// Filter by owning user.
    pub user_id: Option<UserId>,

    /// Filter by cart status.
    pub status: Option<CartStatus>,

    /// Maximum number of carts to return.
    pub limit: Option<usize>,

    /// Number of carts to skip.
    pub offset: Option<usize>,
}

impl CartQuery {
    /// Creates a new empty query (all carts).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for the carts of one user.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn status(mut self, status: CartStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Builder for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub user_id: Option<UserId>,
    pub cart_id: Option<CartId>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn for_cart(cart_id: CartId) -> Self {
        Self {
            cart_id: Some(cart_id),
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Builder for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_filters() {
        let query = CartQuery::for_user(UserId::new(3))
            .status(CartStatus::Open)
            .limit(10)
            .offset(20);
        assert_eq!(query.user_id, Some(UserId::new(3)));
        assert_eq!(query.status, Some(CartStatus::Open));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(20));
    }

    #[test]
    fn empty_query_has_no_bounds() {
        let query = OrderQuery::new();
        assert!(query.user_id.is_none());
        assert!(query.cart_id.is_none());
        assert!(query.limit.is_none());
    }
}
