//! Stock ledger: the conditional reserve/release primitives every cart
//! mutation builds on.

use common::MenuId;
use store::UnitOfWork;

use crate::error::DomainError;

/// Takes `qty` units of stock inside the unit of work.
///
/// Fails with [`DomainError::InsufficientStock`] when the conditional
/// decrement affects no row, or with [`DomainError::MenuNotFound`] when the
/// item is no longer live. The caller must abandon the unit of work.
#[tracing::instrument(skip(tx))]
pub async fn reserve<U: UnitOfWork>(
    tx: &mut U,
    menu_id: MenuId,
    qty: u32,
) -> Result<(), DomainError> {
    if tx.reserve_stock(menu_id, qty).await? == 0 {
        // Zero rows also covers an item deleted since the caller looked it up.
        if tx.find_menu(menu_id).await?.is_none() {
            tracing::debug!(%menu_id, "reservation against a deleted menu item");
            return Err(DomainError::MenuNotFound(menu_id));
        }
        metrics::counter!("stock_reservations_rejected_total").increment(1);
        tracing::debug!(%menu_id, qty, "stock reservation rejected");
        return Err(DomainError::InsufficientStock {
            menu_id,
            requested: qty,
        });
    }
    Ok(())
}

/// Returns `qty` units of stock inside the unit of work.
#[tracing::instrument(skip(tx))]
pub async fn release<U: UnitOfWork>(
    tx: &mut U,
    menu_id: MenuId,
    qty: u32,
) -> Result<(), DomainError> {
    if tx.release_stock(menu_id, qty).await? == 0 {
        // The line still references the item, so this only happens if the
        // row vanished underneath us.
        tracing::warn!(%menu_id, qty, "stock release matched no menu row");
        return Err(DomainError::MenuNotFound(menu_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Category, Money};
    use store::{InMemoryStore, NewMenuItem, Store};

    async fn store_with_menu(stock: u32) -> (InMemoryStore, MenuId) {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let menu = tx
            .insert_menu(NewMenuItem {
                name: "Es Jeruk".into(),
                stock,
                price: Money::from_cents(400),
                category: Category::Drink,
                description: "orange juice".into(),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        (store, menu.id)
    }

    #[tokio::test]
    async fn reserve_fails_on_shortfall_without_touching_stock() {
        let (store, menu_id) = store_with_menu(2).await;
        let mut tx = store.begin().await.unwrap();

        let err = reserve(&mut tx, menu_id, 3).await.unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { requested: 3, .. }));

        reserve(&mut tx, menu_id, 2).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.stock_of(menu_id).await, Some(0));
    }

    #[tokio::test]
    async fn release_restores_stock() {
        let (store, menu_id) = store_with_menu(2).await;
        let mut tx = store.begin().await.unwrap();
        release(&mut tx, menu_id, 5).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.stock_of(menu_id).await, Some(7));
    }

    #[tokio::test]
    async fn missing_item_cannot_be_reserved() {
        let (store, _) = store_with_menu(2).await;
        let mut tx = store.begin().await.unwrap();
        let err = reserve(&mut tx, MenuId::new(99), 1).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuNotFound(id) if id == MenuId::new(99)));
    }

    #[tokio::test]
    async fn item_deleted_after_lookup_is_not_found() {
        let (store, menu_id) = store_with_menu(2).await;
        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_menu(menu_id).await.unwrap().is_some());
        assert_eq!(tx.soft_delete_menu(menu_id).await.unwrap(), 1);

        let err = reserve(&mut tx, menu_id, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuNotFound(id) if id == menu_id));
    }
}
