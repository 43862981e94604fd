//! JWT bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use grit_core::error::CoreError;
use grit_core::types::DbId;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a valid `Authorization: Bearer` header.
///
/// Add this as a handler argument to require authentication:
///
/// ```ignore
/// async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<...> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated user's database id.
    pub user_id: DbId,
    /// Whether the user holds the admin flag.
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Authorization header is missing".to_string(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Expected a Bearer token in the Authorization header".to_string(),
            ))
        })?;

        let claims = jwt::validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Token is invalid or expired".to_string(),
            ))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}
