//! QR access tokens: generation, scan URLs and the validity state machine.
//!
//! A token is `valid` while `now <= expires_at` and it has not been revoked.
//! `expired` and `revoked` are terminal: nothing moves a token back to valid.

use rand::RngCore;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of random bytes in a token (hex-encoded to twice as many chars).
pub const TOKEN_BYTES: usize = 32;

/// Shown for unknown and revoked tokens alike.
pub const INVALID_TOKEN: &str = "Invalid token";

/// Shown (with the expiry) when a token has run out.
pub const EXPIRED_TOKEN: &str = "QR token expired";

/// Where a token sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QrTokenState {
    Valid,
    Expired,
    Revoked,
}

/// Generate a fresh opaque token from the thread-local CSPRNG.
///
/// Uniqueness is enforced by the `uq_qr_tokens_token` constraint; collisions
/// at 256 bits are not expected in practice.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Build the public scan URL for a token.
pub fn scan_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}token={token}")
}

/// Classify a token. Revocation wins over expiry.
pub fn token_state(
    expires_at: Timestamp,
    revoked_at: Option<Timestamp>,
    now: Timestamp,
) -> QrTokenState {
    if revoked_at.is_some() {
        QrTokenState::Revoked
    } else if now > expires_at {
        QrTokenState::Expired
    } else {
        QrTokenState::Valid
    }
}

/// Turn a token's state into the error a public scan should see, if any.
pub fn ensure_scannable(
    expires_at: Timestamp,
    revoked_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    match token_state(expires_at, revoked_at, now) {
        QrTokenState::Valid => Ok(()),
        QrTokenState::Revoked => Err(CoreError::NotFoundMessage(INVALID_TOKEN.into())),
        QrTokenState::Expired => Err(CoreError::Gone {
            message: EXPIRED_TOKEN.into(),
            expires_at,
        }),
    }
}
