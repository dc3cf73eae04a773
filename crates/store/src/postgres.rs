use std::collections::HashMap;

use async_trait::async_trait;
use common::{CartId, CartLineId, CartStatus, MenuId, Money, OrderId, UserId};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    Cart, CartDetail, CartLine, CartQuery, LineDetail, MenuItem, NewCartLine, NewMenuItem,
    NewOrder, NewUser, Order, OrderDetail, OrderQuery, Result, StoreError, User, UserQuery,
    UserSummary,
    store::{Store, UnitOfWork},
};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

/// Unit of work backed by a sqlx transaction. Rolled back on drop.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

fn to_u32(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::InvalidRow(format!("{column} out of range: {value}")))
}

fn row_to_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        role: row.try_get::<String, _>("role")?.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_menu(row: &PgRow) -> Result<MenuItem> {
    Ok(MenuItem {
        id: MenuId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        stock: to_u32(row.try_get("stock")?, "stock")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        category: row.try_get::<String, _>("category")?.parse()?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_cart(row: &PgRow) -> Result<Cart> {
    Ok(Cart {
        id: CartId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        status: row.try_get::<String, _>("status")?.parse()?,
        amount: Money::from_cents(row.try_get("amount_cents")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_line(row: &PgRow) -> Result<CartLine> {
    Ok(CartLine {
        id: CartLineId::new(row.try_get("id")?),
        cart_id: CartId::new(row.try_get("cart_id")?),
        menu_id: MenuId::new(row.try_get("menu_id")?),
        unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        qty: to_u32(row.try_get("qty")?, "qty")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_order(row: &PgRow) -> Result<Order> {
    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        cart_id: CartId::new(row.try_get("cart_id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        amount_pay: Money::from_cents(row.try_get("amount_pay_cents")?),
        order_date: row.try_get("order_date")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Reads the `user_name`, `user_phone`, `user_address` columns of a join.
fn row_to_user_summary(row: &PgRow) -> Result<UserSummary> {
    Ok(UserSummary {
        name: row.try_get("user_name")?,
        phone: row.try_get("user_phone")?,
        address: row.try_get("user_address")?,
    })
}

/// Joined line details for a set of carts, keyed by cart.
async fn fetch_line_details(
    conn: &mut PgConnection,
    cart_ids: Vec<i64>,
) -> Result<HashMap<CartId, Vec<LineDetail>>> {
    let rows = sqlx::query(
        r#"
        SELECT l.cart_id, l.menu_id, m.name, l.qty, l.unit_price_cents
        FROM cart_lines l
        JOIN menu_items m ON m.id = l.menu_id
        WHERE l.cart_id = ANY($1) AND l.deleted_at IS NULL
        ORDER BY l.id ASC
        "#,
    )
    .bind(cart_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut details: HashMap<CartId, Vec<LineDetail>> = HashMap::new();
    for row in rows {
        let cart_id = CartId::new(row.try_get("cart_id")?);
        details.entry(cart_id).or_default().push(LineDetail {
            menu_id: MenuId::new(row.try_get("menu_id")?),
            name: row.try_get("name")?,
            qty: to_u32(row.try_get("qty")?, "qty")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        });
    }
    Ok(details)
}

async fn fetch_carts(conn: &mut PgConnection, query: &CartQuery) -> Result<Vec<CartDetail>> {
    let mut sql = String::from(
        r#"
        SELECT c.id, c.user_id, c.status, c.amount_cents, c.created_at, c.updated_at,
               u.name AS user_name, u.phone AS user_phone, u.address AS user_address
        FROM carts c
        JOIN users u ON u.id = c.user_id
        WHERE c.deleted_at IS NULL
        "#,
    );
    let mut param_count = 0;

    if query.user_id.is_some() {
        param_count += 1;
        sql.push_str(&format!(" AND c.user_id = ${param_count}"));
    }
    if query.status.is_some() {
        param_count += 1;
        sql.push_str(&format!(" AND c.status = ${param_count}"));
    }

    sql.push_str(" ORDER BY c.id ASC");

    if query.limit.is_some() {
        param_count += 1;
        sql.push_str(&format!(" LIMIT ${param_count}"));
    }
    if query.offset.is_some() {
        param_count += 1;
        sql.push_str(&format!(" OFFSET ${param_count}"));
    }

    let mut sqlx_query = sqlx::query(&sql);
    if let Some(user_id) = query.user_id {
        sqlx_query = sqlx_query.bind(user_id.get());
    }
    if let Some(status) = query.status {
        sqlx_query = sqlx_query.bind(status.as_str());
    }
    if let Some(limit) = query.limit {
        sqlx_query = sqlx_query.bind(limit as i64);
    }
    if let Some(offset) = query.offset {
        sqlx_query = sqlx_query.bind(offset as i64);
    }

    let rows = sqlx_query.fetch_all(&mut *conn).await?;
    let mut carts = Vec::with_capacity(rows.len());
    for row in &rows {
        carts.push((row_to_cart(row)?, row_to_user_summary(row)?));
    }

    let ids = carts.iter().map(|(c, _)| c.id.get()).collect();
    let mut lines = fetch_line_details(conn, ids).await?;

    Ok(carts
        .into_iter()
        .map(|(cart, user)| CartDetail {
            lines: lines.remove(&cart.id).unwrap_or_default(),
            cart,
            user,
        })
        .collect())
}

async fn fetch_orders(
    conn: &mut PgConnection,
    query: &OrderQuery,
    order_id: Option<OrderId>,
) -> Result<Vec<OrderDetail>> {
    let mut sql = String::from(
        r#"
        SELECT o.id, o.cart_id, o.user_id, o.amount_pay_cents, o.order_date, o.status,
               o.created_at, o.updated_at,
               u.name AS user_name, u.phone AS user_phone, u.address AS user_address
        FROM orders o
        JOIN users u ON u.id = o.user_id
        WHERE o.deleted_at IS NULL
        "#,
    );
    let mut param_count = 0;

    if query.user_id.is_some() {
        param_count += 1;
        sql.push_str(&format!(" AND o.user_id = ${param_count}"));
    }
    if query.cart_id.is_some() {
        param_count += 1;
        sql.push_str(&format!(" AND o.cart_id = ${param_count}"));
    }
    if order_id.is_some() {
        param_count += 1;
        sql.push_str(&format!(" AND o.id = ${param_count}"));
    }

    sql.push_str(" ORDER BY o.id ASC");

    if query.limit.is_some() {
        param_count += 1;
        sql.push_str(&format!(" LIMIT ${param_count}"));
    }
    if query.offset.is_some() {
        param_count += 1;
        sql.push_str(&format!(" OFFSET ${param_count}"));
    }

    let mut sqlx_query = sqlx::query(&sql);
    if let Some(user_id) = query.user_id {
        sqlx_query = sqlx_query.bind(user_id.get());
    }
    if let Some(cart_id) = query.cart_id {
        sqlx_query = sqlx_query.bind(cart_id.get());
    }
    if let Some(order_id) = order_id {
        sqlx_query = sqlx_query.bind(order_id.get());
    }
    if let Some(limit) = query.limit {
        sqlx_query = sqlx_query.bind(limit as i64);
    }
    if let Some(offset) = query.offset {
        sqlx_query = sqlx_query.bind(offset as i64);
    }

    let rows = sqlx_query.fetch_all(&mut *conn).await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in &rows {
        orders.push((row_to_order(row)?, row_to_user_summary(row)?));
    }

    let cart_ids = orders.iter().map(|(o, _)| o.cart_id.get()).collect();
    let mut lines = fetch_line_details(conn, cart_ids).await?;

    Ok(orders
        .into_iter()
        .map(|(order, user)| OrderDetail {
            lines: lines.remove(&order.cart_id).unwrap_or_default(),
            order,
            user,
        })
        .collect())
}

async fn fetch_cart_detail(conn: &mut PgConnection, cart_id: CartId) -> Result<Option<CartDetail>> {
    let row: Option<PgRow> = sqlx::query(
        r#"
        SELECT c.id, c.user_id, c.status, c.amount_cents, c.created_at, c.updated_at,
               u.name AS user_name, u.phone AS user_phone, u.address AS user_address
        FROM carts c
        JOIN users u ON u.id = c.user_id
        WHERE c.id = $1 AND c.deleted_at IS NULL
        "#,
    )
    .bind(cart_id.get())
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let cart = row_to_cart(&row)?;
    let user = row_to_user_summary(&row)?;
    let mut lines = fetch_line_details(conn, vec![cart.id.get()]).await?;

    Ok(Some(CartDetail {
        lines: lines.remove(&cart.id).unwrap_or_default(),
        cart,
        user,
    }))
}

async fn fetch_menu(conn: &mut PgConnection, menu_id: MenuId) -> Result<Option<MenuItem>> {
    let row: Option<PgRow> = sqlx::query(
        r#"
        SELECT id, name, stock, price_cents, category, description, created_at, updated_at
        FROM menu_items
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(menu_id.get())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(row_to_menu).transpose()
}

async fn fetch_user(conn: &mut PgConnection, user_id: UserId) -> Result<Option<User>> {
    let row: Option<PgRow> = sqlx::query(
        r#"
        SELECT id, name, email, phone, address, role, created_at, updated_at
        FROM users
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(user_id.get())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(row_to_user).transpose()
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn reserve_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2 AND deleted_at IS NULL
            "#,
        )
        .bind(menu_id.get())
        .bind(i64::from(qty))
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn release_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(menu_id.get())
        .bind(i64::from(qty))
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_line_for_update(
        &mut self,
        cart_id: CartId,
        menu_id: MenuId,
    ) -> Result<Option<CartLine>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, cart_id, menu_id, unit_price_cents, qty, created_at, updated_at
            FROM cart_lines
            WHERE cart_id = $1 AND menu_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(cart_id.get())
        .bind(menu_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(row_to_line).transpose()
    }

    async fn insert_line(&mut self, line: NewCartLine) -> Result<CartLine> {
        let row = sqlx::query(
            r#"
            INSERT INTO cart_lines (cart_id, menu_id, unit_price_cents, qty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, cart_id, menu_id, unit_price_cents, qty, created_at, updated_at
            "#,
        )
        .bind(line.cart_id.get())
        .bind(line.menu_id.get())
        .bind(line.unit_price.cents())
        .bind(i64::from(line.qty))
        .fetch_one(&mut *self.tx)
        .await?;

        row_to_line(&row)
    }

    async fn update_line_qty(&mut self, line_id: CartLineId, qty: u32) -> Result<()> {
        sqlx::query("UPDATE cart_lines SET qty = $2, updated_at = NOW() WHERE id = $1")
            .bind(line_id.get())
            .bind(i64::from(qty))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_line(&mut self, line_id: CartLineId) -> Result<()> {
        sqlx::query(
            "UPDATE cart_lines SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(line_id.get())
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn lines_for_cart(&mut self, cart_id: CartId) -> Result<Vec<CartLine>> {
        let rows = sqlx::query(
            r#"
            SELECT id, cart_id, menu_id, unit_price_cents, qty, created_at, updated_at
            FROM cart_lines
            WHERE cart_id = $1 AND deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .bind(cart_id.get())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(row_to_line).collect()
    }

    async fn insert_cart(&mut self, user_id: UserId) -> Result<Cart> {
        let row = sqlx::query(
            r#"
            INSERT INTO carts (user_id, status, amount_cents)
            VALUES ($1, $2, 0)
            RETURNING id, user_id, status, amount_cents, created_at, updated_at
            "#,
        )
        .bind(user_id.get())
        .bind(CartStatus::Open.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        row_to_cart(&row)
    }

    async fn find_cart_for_update(&mut self, cart_id: CartId) -> Result<Option<Cart>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, user_id, status, amount_cents, created_at, updated_at
            FROM carts
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(cart_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(row_to_cart).transpose()
    }

    async fn set_cart_amount(&mut self, cart_id: CartId, amount: Money) -> Result<()> {
        sqlx::query("UPDATE carts SET amount_cents = $2, updated_at = NOW() WHERE id = $1")
            .bind(cart_id.get())
            .bind(amount.cents())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_cart_status(&mut self, cart_id: CartId, status: CartStatus) -> Result<()> {
        sqlx::query("UPDATE carts SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(cart_id.get())
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (cart_id, user_id, amount_pay_cents, order_date, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, cart_id, user_id, amount_pay_cents, order_date, status, created_at, updated_at
            "#,
        )
        .bind(order.cart_id.get())
        .bind(order.user_id.get())
        .bind(order.amount_pay.cents())
        .bind(order.order_date)
        .fetch_one(&mut *self.tx)
        .await?;

        row_to_order(&row)
    }

    async fn find_menu(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        fetch_menu(&mut self.tx, menu_id).await
    }

    async fn find_menu_for_update(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, stock, price_cents, category, description, created_at, updated_at
            FROM menu_items
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(menu_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(row_to_menu).transpose()
    }

    async fn insert_menu(&mut self, menu: NewMenuItem) -> Result<MenuItem> {
        let row = sqlx::query(
            r#"
            INSERT INTO menu_items (name, stock, price_cents, category, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, stock, price_cents, category, description, created_at, updated_at
            "#,
        )
        .bind(&menu.name)
        .bind(i64::from(menu.stock))
        .bind(menu.price.cents())
        .bind(menu.category.as_str())
        .bind(&menu.description)
        .fetch_one(&mut *self.tx)
        .await?;

        row_to_menu(&row)
    }

    async fn save_menu(&mut self, menu: &MenuItem) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE menu_items
            SET name = $2, stock = $3, price_cents = $4, category = $5, description = $6,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(menu.id.get())
        .bind(&menu.name)
        .bind(i64::from(menu.stock))
        .bind(menu.price.cents())
        .bind(menu.category.as_str())
        .bind(&menu.description)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn menu_in_use(&mut self, menu_id: MenuId) -> Result<bool> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cart_lines WHERE menu_id = $1 AND deleted_at IS NULL)",
        )
        .bind(menu_id.get())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(in_use)
    }

    async fn soft_delete_menu(&mut self, menu_id: MenuId) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE menu_items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(menu_id.get())
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_user(&mut self, user_id: UserId) -> Result<Option<User>> {
        fetch_user(&mut self.tx, user_id).await
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone, address, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, address, role, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.role.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        row_to_user(&row)
    }

    async fn find_user_for_update(&mut self, user_id: UserId) -> Result<Option<User>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, email, phone, address, role, created_at, updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn save_user(&mut self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, phone = $3, address = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id.get())
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.address)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn user_in_use(&mut self, user_id: UserId) -> Result<bool> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM carts WHERE user_id = $1 AND deleted_at IS NULL)",
        )
        .bind(user_id.get())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(in_use)
    }

    async fn soft_delete_user(&mut self, user_id: UserId) -> Result<u64> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(user_id.get())
                .execute(&mut *self.tx)
                .await?;
        Ok(result.rows_affected())
    }

    async fn cart_detail(&mut self, cart_id: CartId) -> Result<Option<CartDetail>> {
        fetch_cart_detail(&mut self.tx, cart_id).await
    }

    async fn order_detail(&mut self, order_id: OrderId) -> Result<Option<OrderDetail>> {
        let orders = fetch_orders(&mut self.tx, &OrderQuery::new(), Some(order_id)).await?;
        Ok(orders.into_iter().next())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    type Tx = PostgresUnitOfWork;

    async fn begin(&self) -> Result<Self::Tx> {
        Ok(PostgresUnitOfWork {
            tx: self.pool.begin().await?,
        })
    }

    async fn cart_detail(&self, cart_id: CartId) -> Result<Option<CartDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_cart_detail(&mut conn, cart_id).await
    }

    async fn list_carts(&self, query: CartQuery) -> Result<Vec<CartDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_carts(&mut conn, &query).await
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_orders(&mut conn, &query, None).await
    }

    async fn menu(&self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_menu(&mut conn, menu_id).await
    }

    async fn list_menus(&self) -> Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, stock, price_cents, category, description, created_at, updated_at
            FROM menu_items
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_menu).collect()
    }

    async fn user(&self, user_id: UserId) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, user_id).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, email, phone, address, role, created_at, updated_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, address, role, created_at, updated_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit.map(|l| l as i64))
        .bind(query.offset.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }
}
