//! Redis implementation of the OTP store
//!
//! One JSON-encoded `OtpRecord` per account under `otp:record:<userId>`.
//! Keys expire `record_retention_seconds` after the record itself expires;
//! until then an expired record is still returned and rejected by the ledger.
//!
//! Issue reservations live under `otp:cooldown:<userId>` and are taken with a
//! single `SET NX EX`, so concurrent requests across processes admit one.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};

use bh_core::domain::entities::{OtpRecord, UserId};
use bh_core::errors::DomainError;
use bh_core::repositories::OtpStore;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Redis key prefix for OTP records
pub const OTP_RECORD_KEY_PREFIX: &str = "otp:record";

/// Redis key prefix for issue reservations
pub const OTP_COOLDOWN_KEY_PREFIX: &str = "otp:cooldown";

/// Redis-backed OTP store
#[derive(Clone)]
pub struct RedisOtpStore {
    /// Redis client for cache operations
    redis_client: RedisClient,
}

impl RedisOtpStore {
    /// Create a store over a connected client
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    /// Redis key holding the record for an account
    pub fn record_key(&self, user_id: UserId) -> String {
        self.redis_client
            .config()
            .make_key(&format!("{}:{}", OTP_RECORD_KEY_PREFIX, user_id))
    }

    /// Redis key holding the issue reservation for an account
    pub fn cooldown_key(&self, user_id: UserId) -> String {
        self.redis_client
            .config()
            .make_key(&format!("{}:{}", OTP_COOLDOWN_KEY_PREFIX, user_id))
    }

    /// Seconds the key should live for a record
    pub fn expiry_for(&self, record: &OtpRecord) -> u64 {
        let remaining = record.time_until_expiration_at(Utc::now()).num_seconds().max(0) as u64;
        remaining + self.redis_client.config().record_retention_seconds
    }

    async fn put_record(&self, user_id: UserId, record: &OtpRecord) -> Result<(), InfrastructureError> {
        let key = self.record_key(user_id);
        let value = serde_json::to_string(record)?;
        // A zero expiry is rejected by Redis
        let expiry = self.expiry_for(record).max(1);
        self.redis_client.set_with_expiry(&key, &value, expiry).await
    }

    async fn get_record(&self, user_id: UserId) -> Result<Option<OtpRecord>, InfrastructureError> {
        let key = self.record_key(user_id);
        match self.redis_client.get(&key).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, user_id: UserId, record: &OtpRecord) -> Result<(), DomainError> {
        self.put_record(user_id, record).await.map_err(|e| {
            error!(
                user_id = user_id,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store OTP record in Redis"
            );
            DomainError::from(e)
        })?;

        debug!(user_id = user_id, "Stored OTP record in Redis");
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<OtpRecord>, DomainError> {
        self.get_record(user_id).await.map_err(|e| {
            error!(
                user_id = user_id,
                error = %e,
                event = "otp_storage_failed",
                "Failed to load OTP record from Redis"
            );
            DomainError::from(e)
        })
    }

    async fn remove(&self, user_id: UserId) -> Result<bool, DomainError> {
        let key = self.record_key(user_id);
        Ok(self.redis_client.delete(&key).await?)
    }

    async fn try_reserve_issue(
        &self,
        user_id: UserId,
        cooldown_seconds: u64,
    ) -> Result<bool, DomainError> {
        if cooldown_seconds == 0 {
            return Ok(true);
        }
        let key = self.cooldown_key(user_id);
        let reserved = self
            .redis_client
            .set_if_absent_with_expiry(&key, "1", cooldown_seconds)
            .await?;

        debug!(user_id = user_id, reserved = reserved, "Issue reservation attempted");
        Ok(reserved)
    }

    async fn release_issue(&self, user_id: UserId) -> Result<(), DomainError> {
        let key = self.cooldown_key(user_id);
        self.redis_client.delete(&key).await?;
        Ok(())
    }
}
