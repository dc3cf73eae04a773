//! Cart endpoints: create, adjust, read and check out.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CartId, CartStatus, MenuId, UserId};
use domain::{CartItem, Checkout, CreateCart, Page, UpdateCartLine};
use serde::{Deserialize, Serialize};
use store::{CartDetail, LineDetail, Store, UserSummary};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::routes::orders::OrderResponse;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateCartRequest {
    /// Owner of the new cart. Only admins may open carts for other users.
    pub user_id: Option<UserId>,
    pub items: Vec<CartItem>,
}

#[derive(Deserialize)]
pub struct UpdateLineRequest {
    pub menu_id: MenuId,
    /// Signed quantity delta.
    pub qty: i32,
}

// -- Response types --

#[derive(Serialize)]
pub struct UserView {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl From<UserSummary> for UserView {
    fn from(user: UserSummary) -> Self {
        Self {
            name: user.name,
            phone: user.phone,
            address: user.address,
        }
    }
}

#[derive(Serialize)]
pub struct LineView {
    pub menu_id: MenuId,
    pub name: String,
    pub qty: u32,
    pub unit_price_cents: i64,
}

impl From<LineDetail> for LineView {
    fn from(line: LineDetail) -> Self {
        Self {
            menu_id: line.menu_id,
            name: line.name,
            qty: line.qty,
            unit_price_cents: line.unit_price.cents(),
        }
    }
}

#[derive(Serialize)]
pub struct CartResponse {
    pub cart_id: CartId,
    pub user: UserView,
    pub amount_cents: i64,
    pub status: CartStatus,
    pub menus: Vec<LineView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartDetail> for CartResponse {
    fn from(detail: CartDetail) -> Self {
        Self {
            cart_id: detail.cart.id,
            user: detail.user.into(),
            amount_cents: detail.cart.amount.cents(),
            status: detail.cart.status,
            menus: detail.lines.into_iter().map(LineView::from).collect(),
            created_at: detail.cart.created_at,
            updated_at: detail.cart.updated_at,
        }
    }
}

fn to_responses(carts: Vec<CartDetail>) -> Json<Vec<CartResponse>> {
    Json(carts.into_iter().map(CartResponse::from).collect())
}

// -- Handlers --

/// POST /carts
#[tracing::instrument(skip(state, payload), fields(user_id = %user.0.user_id))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    payload: Result<Json<CreateCartRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let Json(req) = payload?;
    let owner = req.user_id.unwrap_or(user.0.user_id);
    if !user.0.can_access(owner) {
        return Err(ApiError::Forbidden(
            "cannot open a cart for another user".to_string(),
        ));
    }

    let cmd = CreateCart::new(owner, req.items);
    state.validator.create_cart(&cmd)?;
    let cart = state.carts.create_cart(cmd).await?;

    Ok((StatusCode::CREATED, Json(cart.into())))
}

/// PUT /carts/{id}
#[tracing::instrument(skip(state, payload), fields(user_id = %user.0.user_id))]
pub async fn update_line<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateLineRequest>, JsonRejection>,
) -> Result<Json<CartResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = UpdateCartLine::new(CartId::new(id), req.menu_id, req.qty);
    state.validator.update_cart_line(&cmd)?;
    let cart = state.carts.update_cart_line(user.0, cmd).await?;

    Ok(Json(cart.into()))
}

/// POST /carts/{id}/checkout
#[tracing::instrument(skip(state), fields(user_id = %user.0.user_id))]
pub async fn checkout<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .checkout
        .checkout(user.0, Checkout::new(CartId::new(id)))
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /carts/mine
#[tracing::instrument(skip(state), fields(user_id = %user.0.user_id))]
pub async fn mine<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<CartResponse>>, ApiError> {
    let carts = state
        .carts
        .get_carts_by_user(user.0.user_id, page.clamp(state.max_page_size))
        .await?;
    Ok(to_responses(carts))
}

/// GET /carts/{id} (admin)
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<CartResponse>, ApiError> {
    user.require_admin()?;
    let cart = state.carts.get_cart_by_id(CartId::new(id)).await?;
    Ok(Json(cart.into()))
}

/// GET /carts (admin)
#[tracing::instrument(skip(state))]
pub async fn list_all<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<CartResponse>>, ApiError> {
    user.require_admin()?;
    let carts = state
        .carts
        .get_all_carts(page.clamp(state.max_page_size))
        .await?;
    Ok(to_responses(carts))
}
