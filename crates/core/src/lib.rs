//! Domain types and pure rules for the farm-monitoring backend.
//!
//! Nothing in this crate performs I/O. The database, sensor and API crates
//! build on these enums, validators and state machines.

pub mod accounts;
pub mod crop_health;
pub mod error;
pub mod plant;
pub mod qr_token;
pub mod roles;
pub mod sensor_fields;
pub mod types;
