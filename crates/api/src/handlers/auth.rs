//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use baitong_core::accounts::check_login;
use baitong_core::error::CoreError;
use baitong_core::roles::Role;
use baitong_core::types::{DbId, Timestamp};
use baitong_db::models::user::UserResponse;
use baitong_db::repositories::{RevokedTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{decode_for_revocation, issue_session_token};
use crate::auth::password::{verify_dummy, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::{bearer_token, AuthUser, INVALID_TOKEN};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`. Fields are optional so that a
/// missing one yields the domain message rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub identity: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The caller as seen through their token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: DbId,
    pub identity: String,
    pub role: Role,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Exchange identity + password for a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let identity = input.identity.as_deref().map(str::trim).unwrap_or_default();
    let password = input.password.as_deref().unwrap_or_default();
    if identity.is_empty() || password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "identity and password are required".into(),
        )));
    }

    let user = UserRepo::find_by_identity(&state.pool, identity).await?;

    // Verify before looking at status so a disabled account is only
    // revealed to someone who knows its password.
    let (status, password_matches) = match &user {
        Some(user) => {
            let matches = verify_password(password, &user.password_hash).map_err(|e| {
                AppError::InternalError(format!("Password verification error: {e}"))
            })?;
            (Some(user.status()?), matches)
        }
        None => (None, verify_dummy(password)),
    };

    if let Err(err) = check_login(status, password_matches) {
        tracing::info!(identity, reason = %err, "Login rejected");
        return Err(err.into());
    }
    let user = user.ok_or_else(|| AppError::InternalError("login accepted without user".into()))?;

    let role = user.role()?;
    let (token, _claims) = issue_session_token(user.id, &user.identity, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token signing error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        expires_in: state.config.jwt.expiry_secs(),
        user: UserResponse::try_from(&user)?,
    }))
}

/// POST /api/auth/logout
///
/// Revoke the presented token. Expired-but-genuine tokens are accepted so a
/// client can always clean up; repeating the call is harmless.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<MessageResponse>> {
    let token = bearer_token(&headers)?;
    let claims = decode_for_revocation(token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized(INVALID_TOKEN.into())))?;

    let inserted =
        RevokedTokenRepo::revoke(&state.pool, &claims.jti, Some(claims.sub), claims.expires_at())
            .await?;

    tracing::info!(user_id = claims.sub, newly_revoked = inserted, "User logged out");

    Ok(Json(MessageResponse::new("Logged out")))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser) -> Json<DataResponse<SessionInfo>> {
    Json(DataResponse::new(SessionInfo {
        id: user.user_id,
        identity: user.identity,
        role: user.role,
        expires_at: user.expires_at,
    }))
}
