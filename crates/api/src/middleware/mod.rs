//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller behind a valid, unrevoked Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireAuth`] -- requires any authenticated role.

pub mod auth;
pub mod rbac;
