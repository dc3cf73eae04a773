//! Menu catalog maintenance.

use common::MenuId;
use store::{MenuItem, MenuPatch, NewMenuItem, Store, UnitOfWork};

use crate::error::DomainError;

/// Service for reading and maintaining menu items.
#[derive(Clone)]
pub struct CatalogService<S: Store> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, menu), fields(name = %menu.name))]
    pub async fn create(&self, menu: NewMenuItem) -> Result<MenuItem, DomainError> {
        let mut tx = self.store.begin().await?;
        let item = tx.insert_menu(menu).await?;
        tx.commit().await?;

        tracing::info!(menu_id = %item.id, "menu item created");
        Ok(item)
    }

    pub async fn get(&self, menu_id: MenuId) -> Result<MenuItem, DomainError> {
        self.store
            .menu(menu_id)
            .await?
            .ok_or(DomainError::MenuNotFound(menu_id))
    }

    pub async fn list(&self) -> Result<Vec<MenuItem>, DomainError> {
        Ok(self.store.list_menus().await?)
    }

    /// Applies the present fields of `patch` to the locked row.
    #[tracing::instrument(skip(self))]
    pub async fn patch(&self, menu_id: MenuId, patch: MenuPatch) -> Result<MenuItem, DomainError> {
        let mut tx = self.store.begin().await?;
        let mut item = tx
            .find_menu_for_update(menu_id)
            .await?
            .ok_or(DomainError::MenuNotFound(menu_id))?;
        patch.apply(&mut item);
        tx.save_menu(&item).await?;
        tx.commit().await?;

        Ok(item)
    }

    /// Soft-deletes an item that no cart line references.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, menu_id: MenuId) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;
        if tx.find_menu_for_update(menu_id).await?.is_none() {
            return Err(DomainError::MenuNotFound(menu_id));
        }
        if tx.menu_in_use(menu_id).await? {
            return Err(DomainError::MenuInUse(menu_id));
        }
        tx.soft_delete_menu(menu_id).await?;
        tx.commit().await?;

        tracing::info!("menu item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Category, Money, Role};
    use store::{InMemoryStore, NewCartLine, NewUser};

    fn nasi_goreng() -> NewMenuItem {
        NewMenuItem {
            name: "Nasi Goreng".into(),
            stock: 5,
            price: Money::from_cents(500),
            category: Category::Food,
            description: "fried rice".into(),
        }
    }

    fn service() -> CatalogService<InMemoryStore> {
        CatalogService::new(InMemoryStore::new())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let item = service.create(nasi_goreng()).await.unwrap();
        assert_eq!(service.get(item.id).await.unwrap(), item);
        assert_eq!(service.list().await.unwrap().len(), 1);

        let missing = service.get(MenuId::new(404)).await.unwrap_err();
        assert!(matches!(missing, DomainError::MenuNotFound(_)));
    }

    #[tokio::test]
    async fn test_patch_changes_only_present_fields() {
        let service = service();
        let item = service.create(nasi_goreng()).await.unwrap();

        let patched = service
            .patch(
                item.id,
                MenuPatch {
                    price: Some(Money::from_cents(650)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.price, Money::from_cents(650));
        assert_eq!(patched.name, item.name);
        assert_eq!(service.get(item.id).await.unwrap().price, patched.price);

        let err = service
            .patch(
                MenuId::new(404),
                MenuPatch {
                    stock: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MenuNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_rejected_while_referenced() {
        let service = service();
        let item = service.create(nasi_goreng()).await.unwrap();

        let mut tx = service.store.begin().await.unwrap();
        let user = tx
            .insert_user(NewUser {
                name: "Budi".into(),
                email: "budi@example.com".into(),
                phone: "0812".into(),
                address: "Jl. Merdeka 1".into(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        let cart = tx.insert_cart(user.id).await.unwrap();
        let line = tx
            .insert_line(NewCartLine {
                cart_id: cart.id,
                menu_id: item.id,
                unit_price: item.price,
                qty: 1,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let err = service.delete(item.id).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuInUse(_)));

        let mut tx = service.store.begin().await.unwrap();
        tx.delete_line(line.id).await.unwrap();
        tx.commit().await.unwrap();

        service.delete(item.id).await.unwrap();
        assert!(matches!(
            service.get(item.id).await.unwrap_err(),
            DomainError::MenuNotFound(_)
        ));
    }
}
