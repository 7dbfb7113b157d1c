//! First-start seeding.

use baitong_core::roles::Role;
use baitong_db::models::user::CreateUser;
use baitong_db::repositories::UserRepo;
use baitong_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Create the configured admin account if no admin exists yet.
///
/// Returns `true` when an account was created. An existing account with the
/// same identity but another role is left untouched.
pub async fn ensure_admin(pool: &DbPool, identity: &str, password: &str) -> AppResult<bool> {
    if UserRepo::exists_with_role(pool, Role::Admin).await? {
        return Ok(false);
    }
    if UserRepo::find_by_identity(pool, identity).await?.is_some() {
        tracing::warn!(identity, "No admin exists, but the bootstrap identity is taken");
        return Ok(false);
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            identity: identity.to_string(),
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;

    tracing::warn!(user_id = user.id, identity, "Seeded initial admin account; change its password");
    Ok(true)
}
