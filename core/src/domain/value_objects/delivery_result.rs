//! Outcome of a single OTP delivery attempt.

use serde::{Deserialize, Serialize};

/// Response for both delivered codes and unknown addresses
pub const ANTI_ENUMERATION_MESSAGE: &str = "If an account exists, an OTP will be sent.";

/// Terminal result of an asynchronous delivery request
///
/// Produced exactly once per request. Callers can only distinguish success
/// from failure; an unknown address and a delivered code look the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Whether the request completed without a delivery-layer failure
    pub succeeded: bool,

    /// Human-readable outcome
    pub message: String,
}

impl DeliveryResult {
    /// Successful result with a message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    /// Failed result with a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }

    /// The response shared by delivered codes, unknown addresses and throttled requests
    pub fn accepted() -> Self {
        Self::success(ANTI_ENUMERATION_MESSAGE)
    }

    /// Failure caused by an unexpected fault
    pub fn system_error(description: impl std::fmt::Display) -> Self {
        Self::failure(format!("System error: {}", description))
    }
}
