//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use common::{OrderId, OrderStatus};
use domain::Page;
use serde::Serialize;
use store::{OrderDetail, Store};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::routes::carts::{LineView, UserView};

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub user: UserView,
    pub amount_pay_cents: i64,
    pub menus: Vec<LineView>,
    pub status: OrderStatus,
}

impl From<OrderDetail> for OrderResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order_id: detail.order.id,
            order_date: detail.order.order_date,
            user: detail.user.into(),
            amount_pay_cents: detail.order.amount_pay.cents(),
            menus: detail.lines.into_iter().map(LineView::from).collect(),
            status: detail.order.status,
        }
    }
}

/// GET /orders: the caller's own orders.
#[tracing::instrument(skip(state), fields(user_id = %user.0.user_id))]
pub async fn mine<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .checkout
        .list_orders_for_user(user.0.user_id, page.clamp(state.max_page_size))
        .await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
