//! OTP ledger: issues hashed passcodes and verifies submissions

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use bh_shared::config::OtpConfig;

use crate::domain::entities::account::UserId;
use crate::domain::entities::otp_record::{IssuedOtp, OtpRecord};
use crate::errors::DomainResult;
use crate::repositories::otp::r#trait::OtpStore;
use crate::services::hashing::OtpCodeHasher;
use crate::services::secure_code::SecureRandomCode;

/// Issues and verifies one-time passcodes for accounts
///
/// At most one record per account is current: issuing again overwrites the
/// previous record, so an earlier code stops verifying.
pub struct OtpLedger<S: OtpStore> {
    /// Store for hashed records
    store: Arc<S>,
    /// Passcode hash policy
    hasher: OtpCodeHasher,
    /// Passcode policy
    config: OtpConfig,
}

impl<S: OtpStore> OtpLedger<S> {
    /// Create a ledger over a store
    ///
    /// # Arguments
    ///
    /// * `store` - OTP store implementation
    /// * `config` - Passcode policy (length, validity, hash cost)
    pub fn new(store: Arc<S>, config: OtpConfig) -> Self {
        let hasher = OtpCodeHasher::new(&config);
        Self {
            store,
            hasher,
            config,
        }
    }

    /// Validity window of a freshly issued code, in minutes
    pub fn validity_minutes(&self) -> i64 {
        self.config.validity_minutes
    }

    /// Passcode policy in use
    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a new code for an account
    pub async fn issue(&self, user_id: UserId) -> DomainResult<IssuedOtp> {
        self.issue_at(user_id, Utc::now()).await
    }

    /// Issue a new code for an account as of `now`
    ///
    /// Generates a code, stores only its salted hash with
    /// `expire_at = now + validity`, and returns the plaintext once.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - Code persisted; the plaintext is for delivery only
    /// * `Err(DomainError)` - Generation, hashing or the store failed
    pub async fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<IssuedOtp> {
        let (code, code_hash) = self.fresh_code()?;
        let record = OtpRecord::new(
            user_id,
            code_hash,
            now,
            Duration::minutes(self.config.validity_minutes),
        );

        self.store.put(user_id, &record).await.map_err(|e| {
            tracing::error!(
                user_id = user_id,
                error = %e,
                event = "otp_storage_failed",
                "Failed to persist OTP record"
            );
            e
        })?;

        tracing::info!(
            user_id = user_id,
            expire_at = %record.expire_at,
            event = "otp_issued",
            "Issued one-time passcode"
        );

        Ok(IssuedOtp { code, record })
    }

    /// Verify a submitted code
    pub async fn verify(&self, user_id: UserId, submitted: &str) -> bool {
        self.verify_at(user_id, submitted, Utc::now()).await
    }

    /// Verify a submitted code as of `now`
    ///
    /// Returns `false` for a malformed submission, a missing or expired
    /// record, a store failure or a hash mismatch. Expired records are left
    /// in place. With `consume_on_success` the record is removed after a
    /// match so the code cannot be replayed.
    pub async fn verify_at(&self, user_id: UserId, submitted: &str, now: DateTime<Utc>) -> bool {
        if !SecureRandomCode::is_well_formed(submitted, self.config.code_length) {
            tracing::debug!(
                user_id = user_id,
                event = "otp_verify_failed",
                reason = "malformed",
                "Submitted OTP has an invalid format"
            );
            return false;
        }

        let record = match self.store.get(user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(
                    user_id = user_id,
                    event = "otp_verify_failed",
                    reason = "not_found",
                    "No OTP issued for account"
                );
                return false;
            }
            Err(e) => {
                tracing::error!(
                    user_id = user_id,
                    error = %e,
                    event = "otp_verify_failed",
                    reason = "store",
                    "Failed to load OTP record"
                );
                return false;
            }
        };

        if record.is_expired_at(now) {
            tracing::info!(
                user_id = user_id,
                expire_at = %record.expire_at,
                event = "otp_expired",
                "Submitted OTP has expired"
            );
            return false;
        }

        if !self.hasher.verify(submitted, &record.code_hash) {
            tracing::warn!(
                user_id = user_id,
                event = "otp_verify_failed",
                reason = "mismatch",
                "Submitted OTP does not match"
            );
            return false;
        }

        if self.config.consume_on_success {
            // A failed removal leaves the code replayable until expiry; the match still stands.
            if let Err(e) = self.store.remove(user_id).await {
                tracing::warn!(
                    user_id = user_id,
                    error = %e,
                    event = "otp_consume_failed",
                    "Failed to remove verified OTP record"
                );
            }
        }

        tracing::info!(user_id = user_id, event = "otp_verified", "OTP verified");
        true
    }

    /// Atomically claim the resend window for an account
    ///
    /// `Ok(false)` when an earlier claim is still live.
    pub async fn reserve_issue(&self, user_id: UserId, cooldown_seconds: u64) -> DomainResult<bool> {
        self.store.try_reserve_issue(user_id, cooldown_seconds).await
    }

    /// Give back a claimed resend window
    pub async fn release_issue(&self, user_id: UserId) -> DomainResult<()> {
        self.store.release_issue(user_id).await
    }

    /// Spend the work of an issuance without storing anything
    ///
    /// Generates and hashes a throwaway code so that requests for addresses
    /// without an account cost about as much as real ones.
    pub fn issue_decoy(&self) {
        if let Err(e) = self.fresh_code() {
            tracing::debug!(error = %e, "Decoy OTP hash failed");
        }
    }

    /// Current record for an account, expired or not
    pub async fn current_record(&self, user_id: UserId) -> DomainResult<Option<OtpRecord>> {
        self.store.get(user_id).await
    }

    /// Generate a code and its salted hash
    fn fresh_code(&self) -> DomainResult<(String, String)> {
        let code = SecureRandomCode::generate(self.config.code_length)?;
        let code_hash = self.hasher.hash(&code)?;
        Ok((code, code_hash))
    }
}
