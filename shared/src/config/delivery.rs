//! OTP delivery and mail transport configuration

use serde::{Deserialize, Serialize};

/// OTP delivery behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Minimum seconds between two issued codes for the same account (0 disables)
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_seconds: i64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_seconds: default_resend_cooldown(),
        }
    }
}

impl DeliveryConfig {
    /// Delivery without a resend cooldown
    pub fn without_cooldown() -> Self {
        Self {
            resend_cooldown_seconds: 0,
        }
    }
}

/// Mail transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Transport provider ("mock", "http")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Transactional mail API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Sender address
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Optional sender display name
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Subject line used for OTP mails
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: default_api_url(),
            api_key: String::new(),
            sender_email: default_sender_email(),
            sender_name: None,
            subject: default_subject(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or(defaults.provider),
            api_url: std::env::var("MAIL_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            sender_email: std::env::var("MAIL_SENDER_EMAIL").unwrap_or(defaults.sender_email),
            sender_name: std::env::var("MAIL_SENDER_NAME").ok(),
            ..defaults
        }
    }

    /// Whether credentials for the HTTP transport are present
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.sender_email.trim().is_empty()
    }
}

fn default_resend_cooldown() -> i64 {
    60
}

fn default_provider() -> String {
    String::from("mock")
}

fn default_api_url() -> String {
    String::from("https://api.brevo.com/v3/smtp/email")
}

fn default_sender_email() -> String {
    String::from("no-reply@bakehouse.local")
}

fn default_subject() -> String {
    String::from("Your BakeHouse verification code")
}

fn default_request_timeout() -> u64 {
    30
}
