//! Trait for mail transport integration

use async_trait::async_trait;

/// Trait for mail transport integration
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send a message body to an address
    ///
    /// `Ok(false)` means the provider declined the message; `Err` carries a
    /// delivery error description.
    async fn send(&self, address: &str, body: &str) -> Result<bool, String>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
