//! Cryptographically secure numeric passcode generation.

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::otp_record::DEFAULT_CODE_LENGTH;
use crate::errors::ValidationError;

/// Longest code that still fits the `u64` draw range
pub const MAX_CODE_LENGTH: usize = 18;

/// Generator for fixed-length decimal passcodes
///
/// Draws from the OS CSPRNG (`OsRng`); there is no seedable state.
pub struct SecureRandomCode;

impl SecureRandomCode {
    /// Generate a code of `length` decimal digits
    ///
    /// The value is uniform over `[0, 10^length)` and left-padded with zeros.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidLength` if `length` is 0 or above `MAX_CODE_LENGTH`
    pub fn generate(length: usize) -> Result<String, ValidationError> {
        if length == 0 || length > MAX_CODE_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "code_length".to_string(),
                expected: DEFAULT_CODE_LENGTH,
                actual: length,
            });
        }
        Ok(Self::draw(length))
    }

    /// Generate a code of the default length (6 digits)
    pub fn generate_default() -> String {
        Self::draw(DEFAULT_CODE_LENGTH)
    }

    /// Check that a submitted code has exactly `length` ASCII digits
    pub fn is_well_formed(code: &str, length: usize) -> bool {
        code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
    }

    fn draw(length: usize) -> String {
        let upper = 10u64.pow(length as u32);
        // gen_range samples without modulo bias
        let value = OsRng.gen_range(0..upper);
        format!("{:0width$}", value, width = length)
    }
}
