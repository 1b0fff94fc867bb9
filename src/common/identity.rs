use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::common::AppState;
use crate::entity::users;
use crate::error::AppError;

/// Header carrying the authenticated user id, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request-scoped technician identity.
///
/// Authentication itself happens upstream; this extractor only verifies that
/// the forwarded id maps to a known account and carries the display name used
/// in ledger and problem records. Handlers that write take this as an
/// argument, so identity is always an explicit input rather than ambient
/// state.
#[derive(Debug, Clone)]
pub struct TechIdentity {
    pub id: i32,
    pub name: String,
}

impl FromRequestParts<AppState> for TechIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;

        let id: i32 = raw
            .trim()
            .parse()
            .map_err(|_| AppError::Unauthorized(format!("invalid user id '{raw}'")))?;

        let user = users::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("unknown user {id}")))?;

        Ok(Self {
            id: user.id,
            name: user.name,
        })
    }
}
