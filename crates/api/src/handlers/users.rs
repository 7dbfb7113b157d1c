//! Handlers for the `/users` resource (account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use baitong_core::accounts::{AccountStatus, MIN_PASSWORD_LENGTH};
use baitong_core::error::CoreError;
use baitong_core::roles::Role;
use baitong_core::types::DbId;
use baitong_db::models::user::{CreateUser, UpdateUser, UserResponse};
use baitong_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(max = 255))]
    pub identity: Option<String>,
    #[validate(length(max = 1024))]
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 1024))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
///
/// All accounts, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let responses = users
        .iter()
        .map(UserResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse::new(responses)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(DataResponse::new(UserResponse::try_from(&user)?)))
}

/// POST /api/users
///
/// Create an account. The identity pre-check gives a friendly 409; the
/// `uq_users_identity` constraint still decides races.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(input): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;

    let identity = input.identity.as_deref().map(str::trim).unwrap_or_default();
    let password = input.password.as_deref().unwrap_or_default();
    let role = input.role.as_deref().map(str::trim).unwrap_or_default();
    if identity.is_empty() || password.is_empty() || role.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "identity, password and role are required".into(),
        )));
    }
    let role = Role::from_str_db(role)?;
    let password_hash = hash_new_password(password)?;

    if UserRepo::find_by_identity(&state.pool, identity).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Identity already exists".into(),
        )));
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            identity: identity.to_string(),
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, created_by = admin.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::try_from(&user)?)),
    ))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;

    let update = UpdateUser {
        password_hash: input.password.as_deref().map(hash_new_password).transpose()?,
        role: input.role.as_deref().map(Role::from_str_db).transpose()?,
        status: input
            .status
            .as_deref()
            .map(AccountStatus::from_str_db)
            .transpose()?,
    };
    if update.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No fields to update".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    tracing::info!(user_id = id, "User updated");

    Ok(Json(DataResponse::new(UserResponse::try_from(&user)?)))
}

/// DELETE /api/users/{id}
///
/// Hard delete. Revocation entries keep their `jti` with `user_id` nulled.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(user_not_found(id));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");

    Ok(Json(MessageResponse::new("User deleted")))
}
