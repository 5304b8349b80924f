//! OTP store interface.

use async_trait::async_trait;

use crate::domain::entities::account::UserId;
use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

/// Persistence of hashed passcode records, one current record per account
///
/// Implementations must serialize writes per account so that the last `put`
/// wins. Expired records may be retained; callers check `expire_at`.
///
/// Issue reservations are separate from records: `try_reserve_issue` must be
/// a single atomic check-and-set so that concurrent callers for one account
/// cannot all win the same window.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any previous record for the account
    async fn put(&self, user_id: UserId, record: &OtpRecord) -> Result<(), DomainError>;

    /// Fetch the current record for an account
    async fn get(&self, user_id: UserId) -> Result<Option<OtpRecord>, DomainError>;

    /// Remove the current record
    ///
    /// # Returns
    /// * `Ok(true)` - A record was removed
    /// * `Ok(false)` - No record existed
    async fn remove(&self, user_id: UserId) -> Result<bool, DomainError>;

    /// Reserve the right to issue a new code for `cooldown_seconds`
    ///
    /// # Returns
    /// * `Ok(true)` - Reservation taken; the caller may issue
    /// * `Ok(false)` - Another reservation for the account is still live
    async fn try_reserve_issue(&self, user_id: UserId, cooldown_seconds: u64)
        -> Result<bool, DomainError>;

    /// Drop a live reservation so the account can request again immediately
    async fn release_issue(&self, user_id: UserId) -> Result<(), DomainError>;
}
