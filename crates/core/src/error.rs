use crate::types::{DbId, Timestamp};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Not-found condition that is not keyed by a numeric id (e.g. an
    /// opaque QR token). The message is shown to the client verbatim.
    #[error("Not found: {0}")]
    NotFoundMessage(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The resource existed but is no longer available (expired QR token).
    #[error("Gone: {message} (expired at {expires_at})")]
    Gone {
        message: String,
        expires_at: Timestamp,
    },
}
