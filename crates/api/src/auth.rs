//! Trusted identity supplied by the upstream gateway.
//!
//! The gateway authenticates the caller and forwards the result in two
//! headers; this service does not verify them.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{Actor, Role, UserId};

use crate::error::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role. Absent means `customer`.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor for the calling [`Actor`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

impl CurrentUser {
    /// Rejects callers that are not admins.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin role required".to_string()))
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::Unauthorized(format!("invalid {USER_ID_HEADER} header")))?;

        let role = match parts.headers.get(USER_ROLE_HEADER) {
            None => Role::Customer,
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse::<Role>().ok())
                .ok_or_else(|| {
                    ApiError::Unauthorized(format!("invalid {USER_ROLE_HEADER} header"))
                })?,
        };

        Ok(CurrentUser(Actor {
            user_id: UserId::new(user_id),
            role,
        }))
    }
}
