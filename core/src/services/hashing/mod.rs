//! Credential hashing policies
//!
//! Two independent one-way, salted policies:
//! - `OtpCodeHasher` - PBKDF2-HMAC-SHA256 with a fixed cost for short-lived passcodes
//! - `PasswordHasher` - bcrypt with a configurable work factor for account passwords

mod otp_hasher;
mod password_hasher;

#[cfg(test)]
mod tests;

pub use otp_hasher::{OtpCodeHasher, OTP_HASH_DELIMITER};
pub use password_hasher::PasswordHasher;
