//! In-memory OTP store for development and testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::account::UserId;
use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

use super::trait_::OtpStore;

/// Longest reservation honoured, keeps the lapse time representable
const MAX_RESERVATION_SECONDS: u64 = 10 * 365 * 24 * 3600;

/// In-memory OTP store
#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    records: Arc<RwLock<HashMap<UserId, OtpRecord>>>,
    /// Issue reservations, keyed by account, holding the time they lapse
    reservations: Arc<RwLock<HashMap<UserId, DateTime<Utc>>>>,
    should_fail: Arc<AtomicBool>,
}

impl InMemoryOtpStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every call fails
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_should_fail(true);
        store
    }

    /// Make every subsequent call fail with a store error
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of stored records, expired ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::store("OTP store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, user_id: UserId, record: &OtpRecord) -> Result<(), DomainError> {
        self.check_available()?;
        self.records.write().await.insert(user_id, record.clone());
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<OtpRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn remove(&self, user_id: UserId) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.records.write().await.remove(&user_id).is_some())
    }

    async fn try_reserve_issue(
        &self,
        user_id: UserId,
        cooldown_seconds: u64,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let now = Utc::now();
        let mut reservations = self.reservations.write().await;
        if matches!(reservations.get(&user_id), Some(until) if *until > now) {
            return Ok(false);
        }
        let cooldown = cooldown_seconds.min(MAX_RESERVATION_SECONDS) as i64;
        reservations.insert(user_id, now + Duration::seconds(cooldown));
        Ok(true)
    }

    async fn release_issue(&self, user_id: UserId) -> Result<(), DomainError> {
        self.check_available()?;
        self.reservations.write().await.remove(&user_id);
        Ok(())
    }
}
