//! One-time passcode record for step-up verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::account::UserId;

/// Length of a one-time passcode
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default expiration time for one-time passcodes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Stored state of the most recently issued passcode for an account
///
/// Only the salted hash of the code is kept. A record is logically dead once
/// `expire_at` has passed, even if the store still holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Account the code was issued for
    pub user_id: UserId,

    /// `base64(salt):base64(derived_key)`
    pub code_hash: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expire_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a record issued at `issued_at` and valid for `validity`
    pub fn new(
        user_id: UserId,
        code_hash: String,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            user_id,
            code_hash,
            issued_at,
            expire_at: issued_at + validity,
        }
    }

    /// Checks if the record has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks if the record has expired at a given instant
    ///
    /// The boundary instant itself is still valid: expiry means `now > expire_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expire_at
    }

    /// Time remaining until expiration, zero once expired
    pub fn time_until_expiration_at(&self, now: DateTime<Utc>) -> Duration {
        if self.expire_at > now {
            self.expire_at - now
        } else {
            Duration::zero()
        }
    }

    /// Time elapsed since the code was issued
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }
}

/// Result of issuing a passcode: the stored record plus the plaintext code
///
/// The plaintext exists only here, for a single hand-off to the mail
/// transport. It is never persisted and is redacted from `Debug` output.
#[derive(Clone)]
pub struct IssuedOtp {
    /// Plaintext code to deliver
    pub code: String,

    /// Record as persisted in the OTP store
    pub record: OtpRecord,
}

impl IssuedOtp {
    /// Account the code was issued for
    pub fn user_id(&self) -> UserId {
        self.record.user_id
    }

    /// Expiry of the issued code
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.record.expire_at
    }
}

impl std::fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("code", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}
