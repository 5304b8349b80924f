//! Shared utilities and common types for the BakeHouse server
//!
//! This crate provides functionality used by both the core and the
//! infrastructure layers:
//! - Configuration types and loading
//! - Email address utilities (normalisation, validation, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, DeliveryConfig, Environment, LogFormat,
    LoggingConfig, MailConfig, OtpConfig, PasswordConfig,
};
pub use utils::email;
