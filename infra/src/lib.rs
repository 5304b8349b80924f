//! # Infrastructure Layer
//!
//! Concrete collaborators for the BakeHouse step-up authentication core.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis-backed OTP store
//! - **Database**: MySQL directory and account store using SQLx
//! - **Mail**: Log and HTTP mail transports
//! - **Telemetry**: tracing subscriber setup
//! - **Bootstrap**: wiring of the core services from `AppConfig`

use bh_core::errors::DomainError;

pub mod bootstrap;
pub mod cache;
pub mod database;
pub mod mail;
pub mod telemetry;

pub use bootstrap::{bootstrap, bootstrap_from_env, ProductionDispatcher, StepUpServices};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail service error
    #[error("Mail service error: {0}")]
    Mail(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(e: config::ConfigError) -> Self {
        InfrastructureError::Config(e.to_string())
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(e: InfrastructureError) -> Self {
        match e {
            InfrastructureError::Http(_) | InfrastructureError::Mail(_) => DomainError::Transport {
                message: e.to_string(),
            },
            InfrastructureError::Config(_) | InfrastructureError::General(_) => {
                DomainError::Internal {
                    message: e.to_string(),
                }
            }
            _ => DomainError::Store {
                message: e.to_string(),
            },
        }
    }
}
