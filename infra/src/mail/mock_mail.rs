//! Log mail transport
//!
//! Records deliveries in the log instead of sending them. Message bodies
//! carry a plaintext code and are never logged; only the masked address and
//! the body size are.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use bh_core::services::MailTransport;
use bh_shared::utils::email::mask_email;

/// Mail transport for development and testing
#[derive(Clone, Default)]
pub struct LogMailTransport {
    /// Number of messages accepted
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
}

impl LogMailTransport {
    /// Create a new log transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of messages accepted
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, address: &str, body: &str) -> Result<bool, String> {
        let masked = mask_email(address);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = "log",
                address = %masked,
                "Log mail transport simulating failure"
            );
            return Err("Simulated mail sending failure".to_string());
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            target: "mail_transport",
            provider = "log",
            address = %masked,
            body_length = body.len(),
            message_number = count,
            "Mail accepted by log transport"
        );

        Ok(true)
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
