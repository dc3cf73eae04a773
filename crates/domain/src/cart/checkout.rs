//! Checkout: the one-way transition that freezes a cart into an order.

use chrono::Utc;
use common::{Actor, CartStatus, UserId};
use store::{NewOrder, OrderDetail, OrderQuery, Store, StoreError, UnitOfWork};

use crate::error::{DomainError, checkout_conflict};
use crate::page::Page;

use super::Checkout;

/// Service converting open carts into orders.
#[derive(Clone)]
pub struct CheckoutService<S: Store> {
    store: S,
}

impl<S: Store> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Freezes an open cart and materializes its order.
    ///
    /// Strictly single-shot: a second checkout of the same cart fails with
    /// [`DomainError::AlreadyCheckedOut`]. Stock is not touched; it was
    /// reserved when the lines were added.
    #[tracing::instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn checkout(&self, actor: Actor, cmd: Checkout) -> Result<OrderDetail, DomainError> {
        let mut tx = self.store.begin().await?;

        let cart = tx
            .find_cart_for_update(cmd.cart_id)
            .await?
            .filter(|c| actor.can_access(c.user_id))
            .ok_or(DomainError::CartNotFound(cmd.cart_id))?;
        if !cart.status.can_checkout() {
            return Err(DomainError::AlreadyCheckedOut(cart.id));
        }

        tx.set_cart_status(cart.id, CartStatus::CheckedOut).await?;
        let order = tx
            .insert_order(NewOrder {
                cart_id: cart.id,
                user_id: cart.user_id,
                amount_pay: cart.amount,
                order_date: Utc::now(),
            })
            .await
            .map_err(|e| checkout_conflict(cart.id, e))?;

        let detail = tx.order_detail(order.id).await?.ok_or_else(|| {
            DomainError::from(StoreError::InvalidRow(format!(
                "order {} disappeared inside its own transaction",
                order.id
            )))
        })?;
        tx.commit().await?;

        metrics::counter!("checkouts_total").increment(1);
        tracing::info!(order_id = %order.id, amount_pay = %order.amount_pay, "cart checked out");
        Ok(detail)
    }

    /// Lists the orders of a user.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<OrderDetail>, DomainError> {
        let query = page.apply_orders(OrderQuery::for_user(user_id));
        Ok(self.store.list_orders(query).await?)
    }
}
