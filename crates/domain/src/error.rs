//! Domain error taxonomy.
//!
//! Race losses (a listing claimed by someone else, a duplicate rating) are
//! routine outcomes surfaced as typed errors, not failures of the system.
//! Storage-layer errors stay `sqlx::Error` at the repository boundary and are
//! mapped separately by the API layer.

use thiserror::Error;

/// Errors produced by core marketplace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Requester does not own this listing")]
    NotOwner,

    #[error("Requester is not a participant in this order")]
    NotParticipant,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("This order has already been rated by the requester")]
    DuplicateRating,

    #[error("Not found: {0}")]
    NotFound(String),
}
