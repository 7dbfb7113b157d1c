//! User entity model and DTOs.

use baitong_core::accounts::AccountStatus;
use baitong_core::error::CoreError;
use baitong_core::roles::Role;
use baitong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub identity: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Typed role. The column is constrained, so failure means schema drift.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_str_db(&self.role)
    }

    /// Typed account status.
    pub fn status(&self) -> Result<AccountStatus, CoreError> {
        AccountStatus::from_str_db(&self.status)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub identity: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<&User> for UserResponse {
    type Error = CoreError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id,
            identity: user.identity.clone(),
            role: user.role()?,
            status: user.status()?,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub identity: String,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl UpdateUser {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.role.is_none() && self.status.is_none()
    }
}
