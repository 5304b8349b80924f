//! Password service implementation

use std::sync::Arc;

use bh_shared::config::PasswordConfig;

use crate::domain::entities::account::UserId;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::account::r#trait::AccountStore;
use crate::repositories::otp::r#trait::OtpStore;
use crate::services::hashing::PasswordHasher;
use crate::services::otp::OtpLedger;

/// Sets, checks and resets primary account passwords
pub struct PasswordService<A: AccountStore, S: OtpStore> {
    /// Account store holding password hashes
    accounts: Arc<A>,
    /// Ledger used to authorize recovery
    ledger: Arc<OtpLedger<S>>,
    /// Password hash policy
    hasher: PasswordHasher,
}

impl<A: AccountStore, S: OtpStore> PasswordService<A, S> {
    /// Create a new password service
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account store implementation
    /// * `ledger` - OTP ledger shared with the delivery dispatcher
    /// * `config` - Password policy
    pub fn new(accounts: Arc<A>, ledger: Arc<OtpLedger<S>>, config: &PasswordConfig) -> Self {
        Self {
            accounts,
            ledger,
            hasher: PasswordHasher::new(config),
        }
    }

    /// Hash and store a new password
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Password stored
    /// * `Err(DomainError::ValidationErr)` - Empty password
    /// * `Err(DomainError::NotFound)` - Unknown account
    /// * `Err(DomainError)` - Hashing or the store failed
    pub async fn set_password(&self, user_id: UserId, raw: &str) -> DomainResult<()> {
        if raw.is_empty() {
            return Err(Self::password_required().into());
        }

        let password_hash = self.hasher.hash(raw)?;
        self.accounts.set_password_hash(user_id, &password_hash).await?;

        tracing::info!(user_id = user_id, event = "password_changed", "Password updated");
        Ok(())
    }

    /// Check a password against the stored hash
    ///
    /// `Ok(false)` for unknown accounts, accounts without a password, empty
    /// input and malformed stored hashes. Only store failures are errors. A
    /// matching hash with an outdated cost is upgraded in place.
    pub async fn verify_password(&self, user_id: UserId, raw: &str) -> DomainResult<bool> {
        if raw.is_empty() {
            return Ok(false);
        }

        let Some(stored) = self.accounts.get_password_hash(user_id).await? else {
            tracing::debug!(
                user_id = user_id,
                event = "password_verify_failed",
                reason = "no_password",
                "No password stored for account"
            );
            return Ok(false);
        };

        if !self.hasher.verify(raw, &stored) {
            tracing::warn!(
                user_id = user_id,
                event = "password_verify_failed",
                reason = "mismatch",
                "Password does not match"
            );
            return Ok(false);
        }

        if self.hasher.needs_rehash(&stored) {
            match self.hasher.hash(raw) {
                Ok(upgraded) => {
                    if let Err(e) = self.accounts.set_password_hash(user_id, &upgraded).await {
                        tracing::warn!(
                            user_id = user_id,
                            error = %e,
                            event = "password_rehash_failed",
                            "Failed to store upgraded password hash"
                        );
                    } else {
                        tracing::info!(
                            user_id = user_id,
                            event = "password_rehashed",
                            "Upgraded password hash cost"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = user_id,
                        error = %e,
                        event = "password_rehash_failed",
                        "Failed to rehash password"
                    );
                }
            }
        }

        Ok(true)
    }

    /// Replace the password after proving control of the account's mailbox
    ///
    /// The new password and the account are checked before the code so that
    /// neither an empty password nor an unknown account burns a single-use
    /// code. A store failure while writing the new hash happens after the
    /// code was consumed; the caller then has to request a fresh code.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Code accepted and password replaced
    /// * `Ok(false)` - Code rejected; nothing changed
    /// * `Err(DomainError::NotFound)` - Unknown account; the code is untouched
    /// * `Err(DomainError)` - Empty password or store failure
    pub async fn reset_password_with_otp(
        &self,
        user_id: UserId,
        code: &str,
        new_raw: &str,
    ) -> DomainResult<bool> {
        if new_raw.is_empty() {
            return Err(Self::password_required().into());
        }

        if !self.accounts.account_exists(user_id).await? {
            return Err(DomainError::NotFound {
                resource: format!("account {}", user_id),
            });
        }

        if !self.ledger.verify(user_id, code).await {
            tracing::warn!(
                user_id = user_id,
                event = "password_reset_rejected",
                "Password reset with an invalid OTP"
            );
            return Ok(false);
        }

        self.set_password(user_id, new_raw).await?;
        tracing::info!(user_id = user_id, event = "password_reset", "Password reset via OTP");
        Ok(true)
    }

    fn password_required() -> ValidationError {
        ValidationError::RequiredField {
            field: "password".to_string(),
        }
    }
}
