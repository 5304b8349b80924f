//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - One-time passcode and password hashing policies
//! - `cache` - Redis configuration for the OTP store
//! - `database` - Database connection and pool configuration
//! - `delivery` - OTP delivery and mail transport configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod cache;
pub mod database;
pub mod delivery;
pub mod environment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{OtpConfig, PasswordConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use delivery::{DeliveryConfig, MailConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides (`BAKEHOUSE__OTP__CODE_LENGTH=8`)
pub const ENV_PREFIX: &str = "BAKEHOUSE";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// One-time passcode policy
    #[serde(default)]
    pub otp: OtpConfig,

    /// Primary password policy
    #[serde(default)]
    pub password: PasswordConfig,

    /// OTP delivery behaviour
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Mail transport selection and credentials
    #[serde(default)]
    pub mail: MailConfig,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Baseline configuration for an environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => Self {
                environment: Environment::Staging,
                logging: LoggingConfig::for_environment(Environment::Staging),
                ..Self::development()
            },
        }
    }

    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            otp: OtpConfig::default(),
            password: PasswordConfig::default(),
            delivery: DeliveryConfig::default(),
            mail: MailConfig::default(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::new("mysql://localhost:3306/bakehouse_dev"),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            otp: OtpConfig::default(),
            password: PasswordConfig::default(),
            delivery: DeliveryConfig::default(),
            mail: MailConfig {
                provider: String::from("http"),
                ..MailConfig::default()
            },
            cache: CacheConfig::default(),
            database: DatabaseConfig::new("mysql://prod-db:3306/bakehouse")
                .with_max_connections(50),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::for_environment(Environment::from_env());
        config.database = DatabaseConfig::from_env();
        config.cache = CacheConfig::from_env();
        config.mail = MailConfig::from_env();
        config
    }

    /// Load layered configuration
    ///
    /// Layers, lowest precedence first:
    /// 1. Built-in defaults for the detected environment
    /// 2. `config/<environment>.toml` when present
    /// 3. `BAKEHOUSE__*` environment variables (`.env` files are read first)
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env();
        Self::load_from(environment, &format!("config/{}", environment))
    }

    /// Load layered configuration with an explicit file stem
    pub fn load_from(environment: Environment, file_stem: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Self::for_environment(environment))?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
