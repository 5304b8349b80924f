//! Collaborator interfaces consumed by the authentication services.
//!
//! - `account` - address lookup (Directory) and primary credential storage (Account Store)
//! - `otp` - hashed passcode records (OTP Store)

pub mod account;
pub mod otp;

pub use account::{AccountStore, Directory, InMemoryAccountDirectory};
pub use otp::{InMemoryOtpStore, OtpStore};
