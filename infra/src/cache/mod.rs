//! Cache module for Redis-backed OTP storage
//!
//! Provides a Redis client with connection retry logic and the
//! `OtpStore` implementation used in production.

pub mod otp_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use otp_store::{RedisOtpStore, OTP_COOLDOWN_KEY_PREFIX, OTP_RECORD_KEY_PREFIX};
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use bh_shared::config::CacheConfig;
