pub mod plant;
pub mod qr_token;
pub mod revoked_token;
pub mod user;
