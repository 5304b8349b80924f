//! Domain-specific error types and error handling.

mod types;


pub use types::{HashError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl DomainError {
    /// Shorthand for a store failure
    pub fn store(message: impl Into<String>) -> Self {
        DomainError::Store {
            message: message.into(),
        }
    }

    /// Whether the error came from an external collaborator
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, DomainError::Store { .. } | DomainError::Transport { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
