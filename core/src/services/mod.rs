//! Business services containing the step-up authentication logic.

pub mod delivery;
pub mod hashing;
pub mod otp;
pub mod password;
pub mod secure_code;

// Re-export commonly used types
pub use delivery::{DeliveryDispatcher, DeliveryHandle, MailTransport};
pub use hashing::{OtpCodeHasher, PasswordHasher};
pub use otp::OtpLedger;
pub use password::PasswordService;
pub use secure_code::SecureRandomCode;
