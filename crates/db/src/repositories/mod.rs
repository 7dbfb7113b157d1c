mod plant_repo;
mod qr_token_repo;
mod revoked_token_repo;
mod user_repo;

pub use plant_repo::PlantRepo;
pub use qr_token_repo::QrTokenRepo;
pub use revoked_token_repo::RevokedTokenRepo;
pub use user_repo::UserRepo;
