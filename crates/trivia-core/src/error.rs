//! Domain error types.

use thiserror::Error;

use crate::model::CategoryId;

/// Top-level domain error type shared by the ports and the bounded contexts.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A category id did not resolve to a known category.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// The local store holds fewer matching questions than were requested.
    #[error("insufficient questions: requested {requested}, available {available}")]
    InsufficientQuestions {
        /// How many questions were asked for.
        requested: u32,
        /// How many matching questions were actually available.
        available: u32,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/transport error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
