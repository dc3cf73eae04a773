use async_trait::async_trait;
use common::{CartId, CartLineId, CartStatus, MenuId, Money, OrderId, UserId};

use crate::{
    Cart, CartDetail, CartLine, CartQuery, MenuItem, NewCartLine, NewMenuItem, NewOrder, NewUser,
    Order, OrderDetail, OrderQuery, Result, User, UserQuery,
};

/// One transaction against the store.
///
/// All reads see the transaction's own writes. Nothing becomes visible to
/// other units of work until [`UnitOfWork::commit`]; dropping the value
/// without committing rolls every write back.
///
/// Lock order inside a unit of work is cart row, then line row, then menu
/// row. Every cart operation only touches one cart plus the menu rows its
/// lines reference.
#[async_trait]
pub trait UnitOfWork: Send {
    // -- Stock ledger --

    /// Decrements stock by `qty` only if at least `qty` units are available.
    ///
    /// Executed as a single conditional statement. Returns the number of
    /// affected rows: zero means the item is missing or short on stock.
    async fn reserve_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64>;

    /// Increments stock by `qty` unconditionally.
    async fn release_stock(&mut self, menu_id: MenuId, qty: u32) -> Result<u64>;

    // -- Cart lines --

    /// Finds the live line for (cart, menu), holding a row lock on it until
    /// the unit of work ends.
    async fn find_line_for_update(
        &mut self,
        cart_id: CartId,
        menu_id: MenuId,
    ) -> Result<Option<CartLine>>;

    /// Inserts a new line. Fails with `UniqueViolation` if the pair exists.
    async fn insert_line(&mut self, line: NewCartLine) -> Result<CartLine>;

    async fn update_line_qty(&mut self, line_id: CartLineId, qty: u32) -> Result<()>;

    async fn delete_line(&mut self, line_id: CartLineId) -> Result<()>;

    /// Returns the live lines of a cart ordered by id.
    async fn lines_for_cart(&mut self, cart_id: CartId) -> Result<Vec<CartLine>>;

    // -- Carts --

    /// Inserts an open cart with a zero amount.
    async fn insert_cart(&mut self, user_id: UserId) -> Result<Cart>;

    /// Finds a cart, holding a row lock on it until the unit of work ends.
    async fn find_cart_for_update(&mut self, cart_id: CartId) -> Result<Option<Cart>>;

    async fn set_cart_amount(&mut self, cart_id: CartId, amount: Money) -> Result<()>;

    async fn set_cart_status(&mut self, cart_id: CartId, status: CartStatus) -> Result<()>;

    // -- Orders --

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order>;

    // -- Catalog and users --

    async fn find_menu(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>>;

    async fn find_menu_for_update(&mut self, menu_id: MenuId) -> Result<Option<MenuItem>>;

    async fn insert_menu(&mut self, menu: NewMenuItem) -> Result<MenuItem>;

    /// Writes every catalog column of `menu` back to its row.
    async fn save_menu(&mut self, menu: &MenuItem) -> Result<()>;

    /// Returns true if any live cart line references the item.
    async fn menu_in_use(&mut self, menu_id: MenuId) -> Result<bool>;

    /// Soft-deletes a menu item. Returns the number of affected rows.
    async fn soft_delete_menu(&mut self, menu_id: MenuId) -> Result<u64>;

    async fn find_user(&mut self, user_id: UserId) -> Result<Option<User>>;

    async fn insert_user(&mut self, user: NewUser) -> Result<User>;

    /// Finds a live user, holding a row lock on it until the unit of work ends.
    async fn find_user_for_update(&mut self, user_id: UserId) -> Result<Option<User>>;

    /// Writes the profile columns of `user` back to its row.
    async fn save_user(&mut self, user: &User) -> Result<()>;

    /// Returns true if any live cart belongs to the user.
    async fn user_in_use(&mut self, user_id: UserId) -> Result<bool>;

    /// Soft-deletes a user. Returns the number of affected rows.
    async fn soft_delete_user(&mut self, user_id: UserId) -> Result<u64>;

    // -- Joined views --

    async fn cart_detail(&mut self, cart_id: CartId) -> Result<Option<CartDetail>>;

    async fn order_detail(&mut self, order_id: OrderId) -> Result<Option<OrderDetail>>;

    /// Makes every write of this unit of work visible atomically.
    async fn commit(self) -> Result<()>;
}

/// Core trait for store implementations.
///
/// The read side serves committed state only. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait Store: Send + Sync {
    /// The unit of work type opened by [`Store::begin`].
    type Tx: UnitOfWork;

    /// Opens a new unit of work.
    async fn begin(&self) -> Result<Self::Tx>;

    async fn cart_detail(&self, cart_id: CartId) -> Result<Option<CartDetail>>;

    /// Lists carts matching the query, ordered by id.
    async fn list_carts(&self, query: CartQuery) -> Result<Vec<CartDetail>>;

    /// Lists orders matching the query, ordered by id.
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderDetail>>;

    async fn menu(&self, menu_id: MenuId) -> Result<Option<MenuItem>>;

    async fn list_menus(&self) -> Result<Vec<MenuItem>>;

    async fn user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Finds a live user by exact email.
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists live users ordered by id.
    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>>;
}
