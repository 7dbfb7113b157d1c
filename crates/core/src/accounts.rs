//! Account status values and login-time rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Message returned for both unknown identities and wrong passwords, so a
/// caller cannot tell which one it hit.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message returned when the password was correct but the account is off.
pub const ACCOUNT_DISABLED: &str = "Account disabled";

/// Minimum password length for accounts created or updated via the API.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Whether an account may authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    /// Parse a status string from a request body or database row.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            _ => Err(CoreError::Validation(
                "status must be one of: active, disabled".into(),
            )),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }
}

/// Decide the outcome of a login attempt once the password check has run.
///
/// `password_matches` must be `false` when no account was found. The
/// disabled state is only revealed to callers who proved the password.
pub fn check_login(
    status: Option<AccountStatus>,
    password_matches: bool,
) -> Result<(), CoreError> {
    match (status, password_matches) {
        (Some(AccountStatus::Active), true) => Ok(()),
        (Some(AccountStatus::Disabled), true) => {
            Err(CoreError::Forbidden(ACCOUNT_DISABLED.into()))
        }
        _ => Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into())),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_status_values() {
        assert_eq!(AccountStatus::from_str_db("active").unwrap(), AccountStatus::Active);
        assert_eq!(
            AccountStatus::from_str_db("disabled").unwrap(),
            AccountStatus::Disabled
        );
        assert!(AccountStatus::from_str_db("banned").is_err());
    }

    #[test]
    fn active_account_with_correct_password_logs_in() {
        assert!(check_login(Some(AccountStatus::Active), true).is_ok());
    }

    #[test]
    fn unknown_identity_and_wrong_password_look_identical() {
        let unknown = check_login(None, false).unwrap_err().to_string();
        let wrong = check_login(Some(AccountStatus::Active), false)
            .unwrap_err()
            .to_string();
        assert_eq!(unknown, wrong);
    }

    #[test]
    fn disabled_account_with_wrong_password_does_not_leak_status() {
        let err = check_login(Some(AccountStatus::Disabled), false).unwrap_err();
        assert_matches!(err, CoreError::Unauthorized(msg) if msg == INVALID_CREDENTIALS);
    }

    #[test]
    fn disabled_account_with_correct_password_is_forbidden() {
        let err = check_login(Some(AccountStatus::Disabled), true).unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) if msg == ACCOUNT_DISABLED);
    }
}
