//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and checks its role against an
//! allow-list with [`authorize`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use baitong_core::roles::{authorize, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(user.role, &[Role::Admin])?;
        Ok(RequireAdmin(user))
    }
}

/// Requires any authenticated user (admin or ministry).
///
/// Same as [`AuthUser`], named for routes where "signed in" is the whole rule.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(user.role, &[])?;
        Ok(RequireAuth(user))
    }
}
