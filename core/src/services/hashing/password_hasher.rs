//! bcrypt hashing for primary account passwords

use bh_shared::config::PasswordConfig;

use crate::errors::HashError;

/// Adaptive hash policy for passwords
///
/// Output is the self-describing bcrypt string (`$2b$<cost>$<salt+hash>`).
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}

impl PasswordHasher {
    /// Create a hasher from the password policy
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            cost: config.bcrypt_cost,
        }
    }

    /// Configured work factor
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a raw password
    ///
    /// # Errors
    ///
    /// * `HashError::InvalidInput` - the password is empty
    /// * `HashError::Bcrypt` - bcrypt rejected the cost or input
    pub fn hash(&self, raw: &str) -> Result<String, HashError> {
        if raw.is_empty() {
            return Err(HashError::InvalidInput {
                reason: "password must not be empty".to_string(),
            });
        }
        Ok(bcrypt::hash(raw, self.cost)?)
    }

    /// Verify a raw password against a stored hash
    ///
    /// Never errors: empty input or a malformed stored hash yields `false`.
    pub fn verify(&self, raw: &str, stored: &str) -> bool {
        if raw.is_empty() {
            return false;
        }
        match bcrypt::verify(raw, stored) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(
                    event = "password_hash_malformed",
                    error = %e,
                    "Stored password hash could not be parsed"
                );
                false
            }
        }
    }

    /// Whether a stored hash was produced with a different work factor
    ///
    /// Malformed hashes report `true` so that a successful login can replace them.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        match stored.parse::<bcrypt::HashParts>() {
            Ok(parts) => parts.get_cost() != self.cost,
            Err(_) => true,
        }
    }
}
