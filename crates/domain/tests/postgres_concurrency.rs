//! Concurrency tests for the cart engine against PostgreSQL.
//!
//! These tests use a shared PostgreSQL container and exercise the row locks
//! and the conditional stock decrement under real contention. Run with:
//!
//! ```bash
//! cargo test -p domain --test postgres_concurrency
//! ```

use std::sync::Arc;

use common::{Actor, Category, MenuId, Money, Role, UserId};
use domain::{
    CartItem, CartService, Checkout, CheckoutService, CreateCart, ErrorKind, UpdateCartLine,
};
use serial_test::serial;
use sqlx::PgPool;
use store::{NewMenuItem, NewUser, OrderQuery, PostgresStore, Store, UnitOfWork};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(25)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE orders, cart_lines, carts, menu_items, users RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

async fn seed_users(store: &PostgresStore, count: usize) -> Vec<UserId> {
    let mut tx = store.begin().await.unwrap();
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let user = tx
            .insert_user(NewUser {
                name: format!("User {i}"),
                email: format!("user{i}@example.com"),
                phone: "0812".into(),
                address: "Jl. Merdeka 1".into(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        ids.push(user.id);
    }
    tx.commit().await.unwrap();
    ids
}

async fn seed_menu(store: &PostgresStore, stock: u32) -> MenuId {
    let mut tx = store.begin().await.unwrap();
    let menu = tx
        .insert_menu(NewMenuItem {
            name: "Nasi Goreng".into(),
            stock,
            price: Money::from_cents(500),
            category: Category::Food,
            description: "fried rice".into(),
        })
        .await
        .unwrap();
    tx.commit().await.unwrap();
    menu.id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn racing_carts_never_oversell() {
    const STOCK: u32 = 4;
    const RACERS: usize = 12;

    let store = get_test_store().await;
    let users = seed_users(&store, RACERS).await;
    let rice = seed_menu(&store, STOCK).await;
    let service = CartService::new(store.clone());

    let tasks = users.into_iter().map(|user_id| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_cart(CreateCart::new(user_id, vec![CartItem::new(rice, 1)]))
                .await
        })
    });
    let results = futures_util::future::join_all(tasks).await;

    let mut successes = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::InsufficientStock),
        }
    }

    assert_eq!(successes, STOCK as usize);
    assert_eq!(store.menu(rice).await.unwrap().unwrap().stock, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_updates_to_one_line_serialize() {
    const UPDATES: usize = 10;

    let store = get_test_store().await;
    let user_id = seed_users(&store, 1).await[0];
    let rice = seed_menu(&store, 100).await;
    let service = CartService::new(store.clone());
    let actor = Actor::customer(user_id);

    let cart_id = service
        .create_cart(CreateCart::new(user_id, vec![CartItem::new(rice, 1)]))
        .await
        .unwrap()
        .cart
        .id;

    let tasks = (0..UPDATES).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .update_cart_line(actor, UpdateCartLine::new(cart_id, rice, 1))
                .await
        })
    });
    for result in futures_util::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let cart = store.cart_detail(cart_id).await.unwrap().unwrap();
    let qty = cart.line(rice).unwrap().qty;
    assert_eq!(qty as usize, UPDATES + 1);
    assert_eq!(Some(cart.cart.amount), Money::from_cents(500).checked_multiply(qty));
    assert_eq!(store.menu(rice).await.unwrap().unwrap().stock, 100 - qty);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn racing_checkouts_create_one_order() {
    let store = get_test_store().await;
    let user_id = seed_users(&store, 1).await[0];
    let rice = seed_menu(&store, 10).await;
    let actor = Actor::customer(user_id);

    let cart_id = CartService::new(store.clone())
        .create_cart(CreateCart::new(user_id, vec![CartItem::new(rice, 2)]))
        .await
        .unwrap()
        .cart
        .id;

    let service = CheckoutService::new(store.clone());
    let tasks = (0..5).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.checkout(actor, Checkout::new(cart_id)).await })
    });

    let mut successes = 0;
    for result in futures_util::future::join_all(tasks).await {
        match result.unwrap() {
            Ok(order) => {
                successes += 1;
                assert_eq!(order.order.amount_pay, Money::from_cents(1000));
            }
            Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyCheckedOut),
        }
    }

    assert_eq!(successes, 1);
    let orders = store.list_orders(OrderQuery::for_cart(cart_id)).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(store.menu(rice).await.unwrap().unwrap().stock, 8);
}
