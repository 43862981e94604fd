//! Role-based access control extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use grit_core::error::CoreError;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Extractor that requires the caller to be an authenticated admin.
///
/// Wraps [`AuthUser`]: authentication failures surface as 401, and an
/// authenticated non-admin caller is rejected with 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".to_string(),
            )));
        }

        Ok(RequireAdmin(user))
    }
}
