use std::str::FromStr;

use baitong_sensors::{SensorConfigError, SensorSettings};

use crate::auth::jwt::JwtConfig;

/// Startup configuration problems. Fatal: the binary exits with context.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Sensors(#[from] SensorConfigError),
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` and `JWT_SECRET` has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub database_max_connections: u32,
    /// JWT signing secret and session lifetime.
    pub jwt: JwtConfig,
    /// Credentials for the admin account seeded on first start.
    pub admin_identity: String,
    pub admin_password: String,
    /// Base URL encoded into generated QR codes.
    pub qr_base_url: String,
    /// How often expired revocation entries are purged; `0` disables the job.
    pub revocation_cleanup_interval_secs: u64,
    pub sensors: SensorSettings,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_QR_BASE_URL: &str = "https://example.com/qr";
const DEFAULT_ADMIN_IDENTITY: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                             | Default                  |
    /// |-------------------------------------|--------------------------|
    /// | `HOST`                              | `0.0.0.0`                |
    /// | `PORT`                              | `3000`                   |
    /// | `CORS_ORIGINS`                      | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`              | `30`                     |
    /// | `DATABASE_URL`                      | required                 |
    /// | `DATABASE_MAX_CONNECTIONS`          | `10`                     |
    /// | `JWT_SECRET`                        | required                 |
    /// | `JWT_EXPIRY_MINS`                   | `720`                    |
    /// | `ADMIN_IDENTITY` / `ADMIN_PASSWORD` | `admin` / `admin123`     |
    /// | `QR_BASE_URL`                       | `https://example.com/qr` |
    /// | `REVOCATION_CLEANUP_INTERVAL_SECS`  | `3600`                   |
    ///
    /// `INFLUXDB_*` variables are read by [`SensorSettings`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt = JwtConfig {
            secret,
            expiry_mins: parse_or(var("JWT_EXPIRY_MINS"), "JWT_EXPIRY_MINS", 720)?,
        };
        if jwt.expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRY_MINS",
                reason: "must be positive".into(),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parse_or(var("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 30)?,
            database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                baitong_db::DEFAULT_MAX_CONNECTIONS,
            )?,
            jwt,
            admin_identity: var("ADMIN_IDENTITY").unwrap_or_else(|| DEFAULT_ADMIN_IDENTITY.into()),
            admin_password: var("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.into()),
            qr_base_url: var("QR_BASE_URL").unwrap_or_else(|| DEFAULT_QR_BASE_URL.into()),
            revocation_cleanup_interval_secs: parse_or(
                var("REVOCATION_CLEANUP_INTERVAL_SECS"),
                "REVOCATION_CLEANUP_INTERVAL_SECS",
                3600,
            )?,
            sensors: SensorSettings::from_vars(&get)?,
        })
    }
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
