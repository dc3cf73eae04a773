//! Cart service: owns a cart's lifecycle and keeps its total consistent with
//! its lines.

use std::cmp::Ordering;

use common::{Actor, CartId, Money, UserId};
use store::{CartDetail, CartQuery, NewCartLine, Store, StoreError, UnitOfWork};

use crate::error::DomainError;
use crate::page::Page;

use super::{CreateCart, UpdateCartLine, ledger};

/// Service for creating, adjusting and reading carts.
///
/// Every mutation runs inside one unit of work. Any error drops the unit of
/// work, which rolls back stock reservations, line writes and the total.
#[derive(Clone)]
pub struct CartService<S: Store> {
    store: S,
}

impl<S: Store> CartService<S> {
    /// Creates a new cart service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Opens a cart and reserves stock for every requested line.
    ///
    /// All-or-nothing: a missing menu item or a shortfall on any line leaves
    /// no cart, no lines and no reserved stock behind.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id, items = cmd.items.len()))]
    pub async fn create_cart(&self, cmd: CreateCart) -> Result<CartDetail, DomainError> {
        if cmd.items.is_empty() {
            return Err(DomainError::EmptyItems);
        }
        let items = cmd.coalesced_items();

        let mut tx = self.store.begin().await?;
        if tx.find_user(cmd.user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(cmd.user_id));
        }

        let cart = tx.insert_cart(cmd.user_id).await?;
        for item in items {
            let menu = tx
                .find_menu(item.menu_id)
                .await?
                .ok_or(DomainError::MenuNotFound(item.menu_id))?;

            ledger::reserve(&mut tx, menu.id, item.qty).await?;
            tx.insert_line(NewCartLine {
                cart_id: cart.id,
                menu_id: menu.id,
                unit_price: menu.price,
                qty: item.qty,
            })
            .await?;
        }

        let detail = refresh_total(&mut tx, cart.id).await?;
        tx.commit().await?;

        metrics::counter!("carts_created_total").increment(1);
        tracing::info!(cart_id = %cart.id, amount = %detail.cart.amount, "cart created");
        Ok(detail)
    }

    /// Adjusts one line of an open cart by a signed delta.
    ///
    /// The cart row is locked first, then the line row, then the menu row
    /// through the stock ledger. A cart the actor may not access is reported
    /// as not found.
    #[tracing::instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn update_cart_line(
        &self,
        actor: Actor,
        cmd: UpdateCartLine,
    ) -> Result<CartDetail, DomainError> {
        let mut tx = self.store.begin().await?;

        let cart = tx
            .find_cart_for_update(cmd.cart_id)
            .await?
            .filter(|c| actor.can_access(c.user_id))
            .ok_or(DomainError::CartNotFound(cmd.cart_id))?;
        if !cart.status.can_modify_lines() {
            return Err(DomainError::AlreadyCheckedOut(cart.id));
        }

        let qty = cmd.delta.unsigned_abs();
        match tx.find_line_for_update(cart.id, cmd.menu_id).await? {
            None => {
                if cmd.delta <= 0 {
                    return Err(DomainError::InvalidQuantity(format!(
                        "menu item {} is not in cart {}; quantity must be positive",
                        cmd.menu_id, cart.id
                    )));
                }
                let menu = tx
                    .find_menu(cmd.menu_id)
                    .await?
                    .ok_or(DomainError::MenuNotFound(cmd.menu_id))?;

                ledger::reserve(&mut tx, menu.id, qty).await?;
                tx.insert_line(NewCartLine {
                    cart_id: cart.id,
                    menu_id: menu.id,
                    unit_price: menu.price,
                    qty,
                })
                .await?;
            }
            Some(line) => match cmd.delta.cmp(&0) {
                Ordering::Equal => {}
                Ordering::Greater => {
                    let new_qty = line.qty.checked_add(qty).ok_or_else(|| {
                        DomainError::InvalidQuantity(format!("line quantity overflows by {qty}"))
                    })?;
                    ledger::reserve(&mut tx, line.menu_id, qty).await?;
                    tx.update_line_qty(line.id, new_qty).await?;
                }
                Ordering::Less => {
                    if qty > line.qty {
                        return Err(DomainError::InvalidQuantity(format!(
                            "cannot remove {qty} of {} units",
                            line.qty
                        )));
                    }
                    ledger::release(&mut tx, line.menu_id, qty).await?;
                    if qty == line.qty {
                        tx.delete_line(line.id).await?;
                    } else {
                        tx.update_line_qty(line.id, line.qty - qty).await?;
                    }
                }
            },
        }

        let detail = refresh_total(&mut tx, cart.id).await?;
        tx.commit().await?;

        metrics::counter!("cart_updates_total").increment(1);
        tracing::info!(amount = %detail.cart.amount, "cart line updated");
        Ok(detail)
    }

    /// Lists the carts owned by a user.
    #[tracing::instrument(skip(self))]
    pub async fn get_carts_by_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<CartDetail>, DomainError> {
        let query = page.apply(CartQuery::for_user(user_id));
        Ok(self.store.list_carts(query).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_cart_by_id(&self, cart_id: CartId) -> Result<CartDetail, DomainError> {
        self.store
            .cart_detail(cart_id)
            .await?
            .ok_or(DomainError::CartNotFound(cart_id))
    }

    /// Lists every cart.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_carts(&self, page: Page) -> Result<Vec<CartDetail>, DomainError> {
        Ok(self.store.list_carts(page.apply(CartQuery::new())).await?)
    }
}

/// Recomputes the cart total from its current lines, persists it and returns
/// the refreshed view, all inside the caller's unit of work.
async fn refresh_total<U: UnitOfWork>(
    tx: &mut U,
    cart_id: CartId,
) -> Result<CartDetail, DomainError> {
    let lines = tx.lines_for_cart(cart_id).await?;
    let amount = lines
        .iter()
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line.subtotal()?))
        .ok_or_else(|| {
            DomainError::InvalidQuantity(format!("total of cart {cart_id} overflows"))
        })?;
    tx.set_cart_amount(cart_id, amount).await?;

    tx.cart_detail(cart_id).await?.ok_or_else(|| {
        StoreError::InvalidRow(format!("cart {cart_id} disappeared inside its own transaction"))
            .into()
    })
}
