//! PBKDF2-HMAC-SHA256 hashing for one-time passcodes

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use bh_shared::config::OtpConfig;

use crate::errors::HashError;

/// Separator between the encoded salt and the encoded derived key
pub const OTP_HASH_DELIMITER: char = ':';

/// Salted, iterated hash policy for passcodes
///
/// Stored format: `base64(salt) ":" base64(derived_key)`. Codes are short-lived
/// and verified often, so a fixed PBKDF2 cost is used instead of an adaptive
/// scheme.
#[derive(Debug, Clone)]
pub struct OtpCodeHasher {
    iterations: u32,
    salt_length: usize,
    key_length: usize,
}

impl Default for OtpCodeHasher {
    fn default() -> Self {
        Self::new(&OtpConfig::default())
    }
}

impl OtpCodeHasher {
    /// Create a hasher from the OTP policy
    pub fn new(config: &OtpConfig) -> Self {
        Self {
            iterations: config.pbkdf2_iterations,
            salt_length: config.salt_length,
            key_length: config.key_length,
        }
    }

    /// Configured iteration count
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash a code with a fresh random salt
    pub fn hash(&self, code: &str) -> Result<String, HashError> {
        if self.salt_length == 0 {
            return Err(HashError::Derivation {
                message: "salt length must be positive".to_string(),
            });
        }
        let mut salt = vec![0u8; self.salt_length];
        OsRng.fill_bytes(&mut salt);
        self.hash_with_salt(code, &salt)
    }

    /// Hash a code with a caller-provided salt
    pub fn hash_with_salt(&self, code: &str, salt: &[u8]) -> Result<String, HashError> {
        let key = self.derive(code, salt)?;
        Ok(format!(
            "{}{}{}",
            BASE64.encode(salt),
            OTP_HASH_DELIMITER,
            BASE64.encode(key)
        ))
    }

    /// Verify a candidate code against a stored hash
    ///
    /// Fails closed: a stored value that is not exactly two delimited parts,
    /// has an undecodable salt, or cannot be re-derived yields `false`.
    pub fn verify(&self, candidate: &str, stored: &str) -> bool {
        let salt = match Self::decode_salt(stored) {
            Ok(salt) => salt,
            Err(e) => {
                tracing::warn!(event = "otp_hash_malformed", error = %e, "Stored OTP hash is malformed");
                return false;
            }
        };

        match self.hash_with_salt(candidate, &salt) {
            Ok(recomputed) => constant_time_eq(recomputed.as_bytes(), stored.as_bytes()),
            Err(e) => {
                tracing::error!(
                    event = "otp_hash_derivation_failed",
                    error = %e,
                    "Failed to re-derive OTP hash"
                );
                false
            }
        }
    }

    /// Extract the salt from a stored value of exactly two delimited parts
    fn decode_salt(stored: &str) -> Result<Vec<u8>, HashError> {
        let parts: Vec<&str> = stored.split(OTP_HASH_DELIMITER).collect();
        if parts.len() != 2 {
            return Err(HashError::MalformedHash);
        }
        match BASE64.decode(parts[0]) {
            Ok(salt) if !salt.is_empty() => Ok(salt),
            _ => Err(HashError::MalformedHash),
        }
    }

    fn derive(&self, code: &str, salt: &[u8]) -> Result<Vec<u8>, HashError> {
        if self.iterations == 0 {
            return Err(HashError::Derivation {
                message: "iteration count must be positive".to_string(),
            });
        }
        if self.key_length == 0 {
            return Err(HashError::Derivation {
                message: "derived key length must be positive".to_string(),
            });
        }

        let mut key = vec![0u8; self.key_length];
        pbkdf2_hmac::<Sha256>(code.as_bytes(), salt, self.iterations, &mut key);
        Ok(key)
    }
}
