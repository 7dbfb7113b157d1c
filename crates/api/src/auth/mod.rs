//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session token issuing, validation and logout decoding.

pub mod jwt;
pub mod password;
