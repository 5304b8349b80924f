//! One-time passcode and password hashing configuration

use serde::{Deserialize, Serialize};

/// One-time passcode policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of decimal digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Minutes a freshly issued code stays valid
    #[serde(default = "default_validity_minutes")]
    pub validity_minutes: i64,

    /// PBKDF2-HMAC-SHA256 iteration count for stored codes
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Random salt length in bytes
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,

    /// Derived key length in bytes
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    /// Remove the stored record after a successful verification
    #[serde(default = "default_consume_on_success")]
    pub consume_on_success: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            validity_minutes: default_validity_minutes(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            salt_length: default_salt_length(),
            key_length: default_key_length(),
            consume_on_success: default_consume_on_success(),
        }
    }
}

impl OtpConfig {
    /// Validity window in seconds
    pub fn validity_seconds(&self) -> i64 {
        self.validity_minutes * 60
    }

    /// Override the PBKDF2 iteration count
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations;
        self
    }

    /// Keep codes replayable until they expire
    pub fn without_consumption(mut self) -> Self {
        self.consume_on_success = false;
        self
    }
}

/// Primary password policy (bcrypt)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl PasswordConfig {
    /// Create a password policy with a specific cost
    pub fn with_cost(cost: u32) -> Self {
        Self { bcrypt_cost: cost }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_validity_minutes() -> i64 {
    5
}

fn default_pbkdf2_iterations() -> u32 {
    65_536
}

fn default_salt_length() -> usize {
    16
}

fn default_key_length() -> usize {
    32 // 256-bit derived key
}

fn default_consume_on_success() -> bool {
    true
}

fn default_bcrypt_cost() -> u32 {
    12
}
