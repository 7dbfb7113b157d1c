pub mod auth;
pub mod plants;
pub mod qr;
pub mod sensors;
pub mod users;
