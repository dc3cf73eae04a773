//! Menu catalog endpoints. Reads are open; writes require the admin role.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Category, MenuId, Money};
use serde::{Deserialize, Serialize};
use store::{MenuItem, MenuPatch, NewMenuItem, Store};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    pub stock: u32,
    pub price_cents: i64,
    pub category: Category,
    pub description: String,
}

impl From<CreateMenuRequest> for NewMenuItem {
    fn from(req: CreateMenuRequest) -> Self {
        Self {
            name: req.name,
            stock: req.stock,
            price: Money::from_cents(req.price_cents),
            category: req.category,
            description: req.description,
        }
    }
}

#[derive(Deserialize)]
pub struct PatchMenuRequest {
    pub name: Option<String>,
    pub stock: Option<u32>,
    pub price_cents: Option<i64>,
    pub category: Option<Category>,
    pub description: Option<String>,
}

impl From<PatchMenuRequest> for MenuPatch {
    fn from(req: PatchMenuRequest) -> Self {
        Self {
            name: req.name,
            stock: req.stock,
            price: req.price_cents.map(Money::from_cents),
            category: req.category,
            description: req.description,
        }
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct MenuResponse {
    pub id: MenuId,
    pub name: String,
    pub stock: u32,
    pub price_cents: i64,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItem> for MenuResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            stock: item.stock,
            price_cents: item.price.cents(),
            category: item.category,
            description: item.description,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// -- Handlers --

/// GET /menus
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<MenuResponse>>, ApiError> {
    let items = state.catalog.list().await?;
    Ok(Json(items.into_iter().map(MenuResponse::from).collect()))
}

/// GET /menus/{id}
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<MenuResponse>, ApiError> {
    let item = state.catalog.get(MenuId::new(id)).await?;
    Ok(Json(item.into()))
}

/// POST /menus
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    payload: Result<Json<CreateMenuRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuResponse>), ApiError> {
    user.require_admin()?;
    let Json(req) = payload?;
    let menu = NewMenuItem::from(req);
    state.validator.new_menu(&menu)?;
    let item = state.catalog.create(menu).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// PATCH /menus/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn patch<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Result<Json<PatchMenuRequest>, JsonRejection>,
) -> Result<Json<MenuResponse>, ApiError> {
    user.require_admin()?;
    let Json(req) = payload?;
    let patch = MenuPatch::from(req);
    state.validator.menu_patch(&patch)?;
    let item = state.catalog.patch(MenuId::new(id), patch).await?;
    Ok(Json(item.into()))
}

/// DELETE /menus/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;
    state.catalog.delete(MenuId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
