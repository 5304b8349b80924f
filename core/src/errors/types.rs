//! Validation and hashing error types
//!
//! Validation errors describe rejected input. Hash errors describe failures of
//! the credential hashing policies; verification paths never surface them and
//! fail closed instead.

use thiserror::Error;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid length for field: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

/// Credential hashing errors
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Malformed stored hash")]
    MalformedHash,

    #[error("Key derivation failed: {message}")]
    Derivation { message: String },

    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}
