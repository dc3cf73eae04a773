use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CartId, CartLineId, CartStatus, MenuId, Money, OrderId, OrderStatus, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    CART_LINE_UNIQUE, Cart, CartDetail, CartLine, CartQuery, LineDetail, MenuItem, NewCartLine,
    NewMenuItem, NewOrder, NewUser, ORDER_CART_UNIQUE, Order, OrderDetail, OrderQuery, Result,
    StoreError, USER_EMAIL_UNIQUE, User, UserQuery, UserSummary,
    store::{Store, UnitOfWork},
};

#[derive(Debug, Clone)]
struct Stored<T> {
    row: T,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<i64, Stored<T>>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert(&mut self, id: i64, row: T) {
        self.rows.insert(
            id,
            Stored {
                row,
                deleted_at: None,
            },
        );
    }

    /// Live row by id.
    fn get(&self, id: i64) -> Option<&T> {
        self.rows
            .get(&id)
            .filter(|s| s.deleted_at.is_none())
            .map(|s| &s.row)
    }

    /// Row by id, soft-deleted or not.
    fn get_any(&self, id: i64) -> Option<&T> {
        self.rows.get(&id).map(|s| &s.row)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows
            .get_mut(&id)
            .filter(|s| s.deleted_at.is_none())
            .map(|s| &mut s.row)
    }

    fn soft_delete(&mut self, id: i64, at: DateTime<Utc>) -> bool {
        match self.rows.get_mut(&id) {
            Some(stored) if stored.deleted_at.is_none() => {
                stored.deleted_at = Some(at);
                true
            }
            _ => false,
        }
    }

    fn live(&self) -> impl Iterator<Item = &T> {
        self.rows
            .values()
            .filter(|s| s.deleted_at.is_none())
            .map(|s| &s.row)
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Table<User>,
    menus: Table<MenuItem>,
    carts: Table<Cart>,
    lines: Table<CartLine>,
    orders: Table<Order>,
}

impl Tables {
    fn lines_of(&self, cart_id: CartId) -> Vec<CartLine> {
        self.lines
            .live()
            .filter(|l| l.cart_id == cart_id)
            .cloned()
            .collect()
    }

    fn line_details(&self, cart_id: CartId) -> Vec<LineDetail> {
        self.lines
            .live()
            .filter(|l| l.cart_id == cart_id)
            .map(|l| LineDetail {
                menu_id: l.menu_id,
                name: self
                    .menus
                    .get_any(l.menu_id.get())
                    .map(|m| m.name.clone())
                    .unwrap_or_default(),
                qty: l.qty,
                unit_price: l.unit_price,
            })
            .collect()
    }

    fn user_summary(&self, user_id: UserId) -> Option<UserSummary> {
        self.users.get(user_id.get()).map(User::summary)
    }

    fn cart_detail(&self, cart_id: CartId) -> Option<CartDetail> {
        let cart = self.carts.get(cart_id.get())?.clone();
        let user = self.user_summary(cart.user_id)?;
        Some(CartDetail {
            lines: self.line_details(cart.id),
            cart,
            user,
        })
    }

    fn order_detail(&self, order_id: OrderId) -> Option<OrderDetail> {
        let order = self.orders.get(order_id.get())?.clone();
        let user = self.user_summary(order.user_id)?;
        Some(OrderDetail {
            lines: self.line_details(order.cart_id),
            order,
            user,
        })
    }
}

fn page<T>(items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Vec<T> {
    let items = items.into_iter().skip(offset.unwrap_or(0));
    match limit {
        Some(limit) => items.take(limit).collect(),
        None => items.collect(),
    }
}

/// In-memory store implementation for testing and database-less runs.
///
/// Units of work are fully serialized: [`Store::begin`] takes an exclusive
/// lock on the tables and works on a private copy that replaces the shared
/// tables on commit. Dropping the unit of work discards the copy.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the committed stock of a menu item, soft-deleted or not.
    pub async fn stock_of(&self, menu_id: MenuId) -> Option<u32> {
        self.tables
            .lock()
            .await
            .menus
            .get_any(menu_id.get())
            .map(|m| m.stock)
    }

    /// Returns the total number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.live().count()
    }
}

/// Unit of work over [`InMemoryStore`].
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn reserve_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64> {
        match self.work.menus.get_mut(menu_id.get()) {
            Some(menu) if menu.stock >= qty => {
                menu.stock -= qty;
                menu.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn release_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64> {
        match self.work.menus.get_mut(menu_id.get()) {
            Some(menu) => {
                menu.stock = menu.stock.saturating_add(qty);
                menu.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_line_for_update(
        &mut self,
        cart_id: CartId,
        menu_id: MenuId,
    ) -> Result<Option<CartLine>> {
        Ok(self
            .work
            .lines
            .live()
            .find(|l| l.cart_id == cart_id && l.menu_id == menu_id)
            .cloned())
    }

    async fn insert_line(&mut self, line: NewCartLine) -> Result<CartLine> {
        if self
            .work
            .lines
            .live()
            .any(|l| l.cart_id == line.cart_id && l.menu_id == line.menu_id)
        {
            return Err(StoreError::UniqueViolation {
                constraint: CART_LINE_UNIQUE.to_string(),
            });
        }
        if self.work.carts.get(line.cart_id.get()).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "cart_lines_cart_id_fkey".to_string(),
            });
        }
        if self.work.menus.get_any(line.menu_id.get()).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "cart_lines_menu_id_fkey".to_string(),
            });
        }

        let now = Utc::now();
        let id = self.work.lines.next_id();
        let row = CartLine {
            id: CartLineId::new(id),
            cart_id: line.cart_id,
            menu_id: line.menu_id,
            unit_price: line.unit_price,
            qty: line.qty,
            created_at: now,
            updated_at: now,
        };
        self.work.lines.insert(id, row.clone());
        Ok(row)
    }

    async fn update_line_qty(&mut self, line_id: CartLineId, qty: u32) -> Result<()> {
        if let Some(line) = self.work.lines.get_mut(line_id.get()) {
            line.qty = qty;
            line.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_line(&mut self, line_id: CartLineId) -> Result<()> {
        self.work.lines.soft_delete(line_id.get(), Utc::now());
        Ok(())
    }

    async fn lines_for_cart(&mut self, cart_id: CartId) -> Result<Vec<CartLine>> {
        Ok(self.work.lines_of(cart_id))
    }

    async fn insert_cart(&mut self, user_id: UserId) -> Result<Cart> {
        if self.work.users.get(user_id.get()).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "carts_user_id_fkey".to_string(),
            });
        }
        let now = Utc::now();
        let id = self.work.carts.next_id();
        let cart = Cart {
            id: CartId::new(id),
            user_id,
            status: CartStatus::Open,
            amount: Money::zero(),
            created_at: now,
            updated_at: now,
        };
        self.work.carts.insert(id, cart.clone());
        Ok(cart)
    }

    async fn find_cart_for_update(&mut self, cart_id: CartId) -> Result<Option<Cart>> {
        Ok(self.work.carts.get(cart_id.get()).cloned())
    }

    async fn set_cart_amount(&mut self, cart_id: CartId, amount: Money) -> Result<()> {
        if let Some(cart) = self.work.carts.get_mut(cart_id.get()) {
            cart.amount = amount;
            cart.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_cart_status(&mut self, cart_id: CartId, status: CartStatus) -> Result<()> {
        if let Some(cart) = self.work.carts.get_mut(cart_id.get()) {
            cart.status = status;
            cart.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order> {
        if self.work.orders.live().any(|o| o.cart_id == order.cart_id) {
            return Err(StoreError::UniqueViolation {
                constraint: ORDER_CART_UNIQUE.to_string(),
            });
        }
        let now = Utc::now();
        let id = self.work.orders.next_id();
        let row = Order {
            id: OrderId::new(id),
            cart_id: order.cart_id,
            user_id: order.user_id,
            amount_pay: order.amount_pay,
            order_date: order.order_date,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.work.orders.insert(id, row.clone());
        Ok(row)
    }

    async fn find_menu(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        Ok(self.work.menus.get(menu_id.get()).cloned())
    }

    async fn find_menu_for_update(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        Ok(self.work.menus.get(menu_id.get()).cloned())
    }

    async fn insert_menu(&mut self, menu: NewMenuItem) -> Result<MenuItem> {
        let now = Utc::now();
        let id = self.work.menus.next_id();
        let row = MenuItem {
            id: MenuId::new(id),
            name: menu.name,
            stock: menu.stock,
            price: menu.price,
            category: menu.category,
            description: menu.description,
            created_at: now,
            updated_at: now,
        };
        self.work.menus.insert(id, row.clone());
        Ok(row)
    }

    async fn save_menu(&mut self, menu: &MenuItem) -> Result<()> {
        if let Some(row) = self.work.menus.get_mut(menu.id.get()) {
            *row = MenuItem {
                updated_at: Utc::now(),
                ..menu.clone()
            };
        }
        Ok(())
    }

    async fn menu_in_use(&mut self, menu_id: MenuId) -> Result<bool> {
        Ok(self.work.lines.live().any(|l| l.menu_id == menu_id))
    }

    async fn soft_delete_menu(&mut self, menu_id: MenuId) -> Result<u64> {
        Ok(u64::from(
            self.work.menus.soft_delete(menu_id.get(), Utc::now()),
        ))
    }

    async fn find_user(&mut self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.work.users.get(user_id.get()).cloned())
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User> {
        if self.work.users.live().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: USER_EMAIL_UNIQUE.to_string(),
            });
        }
        let now = Utc::now();
        let id = self.work.users.next_id();
        let row = User {
            id: UserId::new(id),
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.work.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_user_for_update(&mut self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.work.users.get(user_id.get()).cloned())
    }

    async fn save_user(&mut self, user: &User) -> Result<()> {
        if let Some(row) = self.work.users.get_mut(user.id.get()) {
            row.name = user.name.clone();
            row.phone = user.phone.clone();
            row.address = user.address.clone();
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn user_in_use(&mut self, user_id: UserId) -> Result<bool> {
        Ok(self.work.carts.live().any(|c| c.user_id == user_id))
    }

    async fn soft_delete_user(&mut self, user_id: UserId) -> Result<u64> {
        Ok(u64::from(
            self.work.users.soft_delete(user_id.get(), Utc::now()),
        ))
    }

    async fn cart_detail(&mut self, cart_id: CartId) -> Result<Option<CartDetail>> {
        Ok(self.work.cart_detail(cart_id))
    }

    async fn order_detail(&mut self, order_id: OrderId) -> Result<Option<OrderDetail>> {
        Ok(self.work.order_detail(order_id))
    }

    async fn commit(self) -> Result<()> {
        let Self { mut guard, work } = self;
        *guard = work;
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Tx> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(InMemoryUnitOfWork { guard, work })
    }

    async fn cart_detail(&self, cart_id: CartId) -> Result<Option<CartDetail>> {
        Ok(self.tables.lock().await.cart_detail(cart_id))
    }

    async fn list_carts(&self, query: CartQuery) -> Result<Vec<CartDetail>> {
        let tables = self.tables.lock().await;
        let carts: Vec<_> = tables
            .carts
            .live()
            .filter(|c| query.user_id.is_none_or(|u| c.user_id == u))
            .filter(|c| query.status.is_none_or(|s| c.status == s))
            .filter_map(|c| tables.cart_detail(c.id))
            .collect();
        Ok(page(carts, query.limit, query.offset))
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderDetail>> {
        let tables = self.tables.lock().await;
        let orders: Vec<_> = tables
            .orders
            .live()
            .filter(|o| query.user_id.is_none_or(|u| o.user_id == u))
            .filter(|o| query.cart_id.is_none_or(|c| o.cart_id == c))
            .filter_map(|o| tables.order_detail(o.id))
            .collect();
        Ok(page(orders, query.limit, query.offset))
    }

    async fn menu(&self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        Ok(self.tables.lock().await.menus.get(menu_id.get()).cloned())
    }

    async fn list_menus(&self) -> Result<Vec<MenuItem>> {
        Ok(self.tables.lock().await.menus.live().cloned().collect())
    }

    async fn user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.tables.lock().await.users.get(user_id.get()).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .live()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>> {
        let users = self.tables.lock().await.users.live().cloned().collect();
        Ok(page(users, query.limit, query.offset))
    }
}

#[cfg(test)]
mod tests {
    use common::{Category, Role};

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Budi".to_string(),
            email: email.to_string(),
            phone: "0812".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            role: Role::Customer,
        }
    }

    fn new_menu(stock: u32) -> NewMenuItem {
        NewMenuItem {
            name: "Es Teh".to_string(),
            stock,
            price: Money::from_cents(500),
            category: Category::Drink,
            description: String::new(),
        }
    }

    async fn seeded(stock: u32) -> (InMemoryStore, UserId, MenuId) {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(new_user("budi@example.com")).await.unwrap();
        let menu = tx.insert_menu(new_menu(stock)).await.unwrap();
        tx.commit().await.unwrap();
        (store, user.id, menu.id)
    }

    #[tokio::test]
    async fn reserve_is_conditional_on_available_stock() {
        let (store, _, menu_id) = seeded(3).await;
        let mut tx = store.begin().await.unwrap();

        assert_eq!(tx.reserve_stock(menu_id, 2).await.unwrap(), 1);
        assert_eq!(tx.reserve_stock(menu_id, 2).await.unwrap(), 0);
        assert_eq!(tx.reserve_stock(menu_id, 1).await.unwrap(), 1);
        assert_eq!(tx.reserve_stock(MenuId::new(999), 1).await.unwrap(), 0);
        tx.commit().await.unwrap();

        assert_eq!(store.stock_of(menu_id).await, Some(0));
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let (store, user_id, menu_id) = seeded(5).await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.reserve_stock(menu_id, 4).await.unwrap();
            tx.insert_cart(user_id).await.unwrap();
        }

        assert_eq!(store.stock_of(menu_id).await, Some(5));
        assert!(store.list_carts(CartQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_line_for_same_menu_is_rejected() {
        let (store, user_id, menu_id) = seeded(5).await;
        let mut tx = store.begin().await.unwrap();
        let cart = tx.insert_cart(user_id).await.unwrap();
        let line = NewCartLine {
            cart_id: cart.id,
            menu_id,
            unit_price: Money::from_cents(500),
            qty: 1,
        };

        tx.insert_line(line.clone()).await.unwrap();
        let err = tx.insert_line(line).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation { ref constraint } if constraint == CART_LINE_UNIQUE
        ));
    }

    #[tokio::test]
    async fn deleted_line_frees_the_pair() {
        let (store, user_id, menu_id) = seeded(5).await;
        let mut tx = store.begin().await.unwrap();
        let cart = tx.insert_cart(user_id).await.unwrap();
        let line = NewCartLine {
            cart_id: cart.id,
            menu_id,
            unit_price: Money::from_cents(500),
            qty: 1,
        };

        let first = tx.insert_line(line.clone()).await.unwrap();
        tx.delete_line(first.id).await.unwrap();
        assert!(
            tx.find_line_for_update(cart.id, menu_id)
                .await
                .unwrap()
                .is_none()
        );
        tx.insert_line(line).await.unwrap();
        assert_eq!(tx.lines_for_cart(cart.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (store, _, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_user(new_user("budi@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn cart_detail_joins_user_and_menu_names() {
        let (store, user_id, menu_id) = seeded(5).await;
        let mut tx = store.begin().await.unwrap();
        let cart = tx.insert_cart(user_id).await.unwrap();
        tx.insert_line(NewCartLine {
            cart_id: cart.id,
            menu_id,
            unit_price: Money::from_cents(500),
            qty: 2,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let detail = store.cart_detail(cart.id).await.unwrap().unwrap();
        assert_eq!(detail.user.name, "Budi");
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.lines[0].name, "Es Teh");
        assert_eq!(detail.lines_total(), Some(Money::from_cents(1000)));
    }

    #[tokio::test]
    async fn soft_deleted_menu_is_hidden_from_catalog() {
        let (store, user_id, menu_id) = seeded(5).await;
        let mut tx = store.begin().await.unwrap();
        let cart = tx.insert_cart(user_id).await.unwrap();
        let line = tx
            .insert_line(NewCartLine {
                cart_id: cart.id,
                menu_id,
                unit_price: Money::from_cents(500),
                qty: 1,
            })
            .await
            .unwrap();
        assert!(tx.menu_in_use(menu_id).await.unwrap());
        tx.delete_line(line.id).await.unwrap();
        assert!(!tx.menu_in_use(menu_id).await.unwrap());
        assert_eq!(tx.soft_delete_menu(menu_id).await.unwrap(), 1);
        assert_eq!(tx.soft_delete_menu(menu_id).await.unwrap(), 0);
        tx.commit().await.unwrap();

        assert!(store.menu(menu_id).await.unwrap().is_none());
        assert!(store.list_menus().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_order_per_cart() {
        let (store, user_id, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let cart = tx.insert_cart(user_id).await.unwrap();
        let order = NewOrder {
            cart_id: cart.id,
            user_id,
            amount_pay: Money::zero(),
            order_date: Utc::now(),
        };
        tx.insert_order(order.clone()).await.unwrap();
        let err = tx.insert_order(order).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn list_carts_filters_and_pages() {
        let (store, user_id, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let other = tx.insert_user(new_user("siti@example.com")).await.unwrap();
        for _ in 0..3 {
            tx.insert_cart(user_id).await.unwrap();
        }
        tx.insert_cart(other.id).await.unwrap();
        tx.commit().await.unwrap();

        let mine = store.list_carts(CartQuery::for_user(user_id)).await.unwrap();
        assert_eq!(mine.len(), 3);

        let page = store
            .list_carts(CartQuery::new().limit(2).offset(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].cart.id, CartId::new(2));
    }

    #[tokio::test]
    async fn user_with_carts_is_in_use() {
        let (store, user_id, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let other = tx.insert_user(new_user("siti@example.com")).await.unwrap();
        tx.insert_cart(user_id).await.unwrap();

        assert!(tx.user_in_use(user_id).await.unwrap());
        assert!(!tx.user_in_use(other.id).await.unwrap());
        assert_eq!(tx.soft_delete_user(other.id).await.unwrap(), 1);
        assert_eq!(tx.soft_delete_user(other.id).await.unwrap(), 0);
        tx.commit().await.unwrap();

        assert!(store.user(other.id).await.unwrap().is_none());
        assert!(
            store
                .user_by_email("siti@example.com")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(store.list_users(UserQuery::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleted_user_frees_the_email() {
        let (store, _, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let other = tx.insert_user(new_user("siti@example.com")).await.unwrap();
        tx.soft_delete_user(other.id).await.unwrap();
        let again = tx.insert_user(new_user("siti@example.com")).await.unwrap();
        tx.commit().await.unwrap();

        let found = store.user_by_email("siti@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(again.id));
    }

    #[tokio::test]
    async fn save_user_writes_profile_columns_only() {
        let (store, user_id, _) = seeded(1).await;
        let mut tx = store.begin().await.unwrap();
        let mut user = tx.find_user_for_update(user_id).await.unwrap().unwrap();
        user.address = "Jl. Sudirman 5".to_string();
        user.email = "changed@example.com".to_string();
        tx.save_user(&user).await.unwrap();
        tx.commit().await.unwrap();

        let stored = store.user(user_id).await.unwrap().unwrap();
        assert_eq!(stored.address, "Jl. Sudirman 5");
        assert_eq!(stored.email, "budi@example.com");
    }
}
