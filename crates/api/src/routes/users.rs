//! User endpoints. Registration is open, `/users/me` serves the caller and
//! the rest require the admin role.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Role, UserId};
use domain::Page;
use serde::{Deserialize, Serialize};
use store::{NewUser, Store, User, UserPatch};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            address: req.address,
        }
    }
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// POST /users: self-registration always yields a customer.
#[tracing::instrument(skip(state, payload))]
pub async fn register<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = payload?;
    let user = NewUser {
        name: req.name,
        email: req.email,
        phone: req.phone,
        address: req.address,
        role: Role::Customer,
    };
    state.validator.new_user(&user)?;
    let user = state.users.register(user).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me
#[tracing::instrument(skip(state), fields(user_id = %user.0.user_id))]
pub async fn profile<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.profile(user.0.user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/me: email and role cannot be changed.
#[tracing::instrument(skip(state, payload), fields(user_id = %user.0.user_id))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;
    let patch = UserPatch::from(req);
    state.validator.user_patch(&patch)?;
    let user = state.users.update(user.0.user_id, patch).await?;
    Ok(Json(user.into()))
}

/// GET /users (admin)
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    user.require_admin()?;
    let users = state.users.list(page.clamp(state.max_page_size)).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id} (admin)
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    user.require_admin()?;
    let user = state.users.get(UserId::new(id)).await?;
    Ok(Json(user.into()))
}

/// GET /users/email/{email} (admin)
#[tracing::instrument(skip(state))]
pub async fn by_email<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    user.require_admin()?;
    let user = state.users.find_by_email(&email).await?;
    Ok(Json(user.into()))
}

/// DELETE /users/{id} (admin)
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;
    state.users.delete(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
