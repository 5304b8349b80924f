//! Value objects representing immutable domain concepts.

pub mod delivery_result;

// Re-export commonly used types
pub use delivery_result::{DeliveryResult, ANTI_ENUMERATION_MESSAGE};
