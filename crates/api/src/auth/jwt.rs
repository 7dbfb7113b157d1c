//! Session token issuing and validation.
//!
//! Session tokens are HS256-signed JWTs containing a [`Claims`] payload. Each
//! carries a unique `jti` so a single token can be revoked at logout without
//! touching the user's other sessions.

use baitong_core::roles::Role;
use baitong_core::types::{DbId, Timestamp};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    pub identity: String,
    pub role: Role,
    /// Unix seconds.
    pub iat: i64,
    pub exp: i64,
    /// Revocation key.
    pub jti: String,
}

impl Claims {
    pub fn expires_at(&self) -> Timestamp {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Signing secret and session lifetime, from `JWT_SECRET` and
/// `JWT_EXPIRY_MINS`.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Minutes; 720 unless configured.
    pub expiry_mins: i64,
}

impl JwtConfig {
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_mins * 60
    }
}

/// Issue a session token for a user. Returns the encoded token along with
/// the claims it carries.
pub fn issue_session_token(
    user_id: DbId,
    identity: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        identity: identity.to_string(),
        role,
        iat: now,
        exp: now + config.expiry_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Validate and decode a session token: signature and expiry.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Decode a token whose signature is ours, even if it has already expired.
///
/// Used at logout, where an expired token still has to yield its `jti`.
pub fn decode_for_revocation(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
