//! Account roles and the route-level authorization rule.
//!
//! Role names must match the `CHECK` constraint on `users.role`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MINISTRY: &str = "ministry";

/// Every role a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Ministry,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Ministry];

    /// Parse a role string from a request body or database row.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_MINISTRY => Ok(Self::Ministry),
            _ => Err(CoreError::Validation(format!(
                "role must be one of: {}",
                Self::allowed_list()
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Ministry => ROLE_MINISTRY,
        }
    }

    /// Comma-separated list of accepted role names, for error messages.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check an authenticated role against a route's allow-list.
///
/// An empty allow-list admits any authenticated role.
pub fn authorize(role: Role, allowed: &[Role]) -> Result<(), CoreError> {
    if allowed.is_empty() || allowed.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Forbidden for this role".into()))
    }
}
