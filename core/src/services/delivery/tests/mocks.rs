//! Mock mail transports for testing the dispatcher

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::services::delivery::MailTransport;

// Records every message it is asked to send
#[derive(Default)]
pub struct RecordingMailTransport {
    pub sent_messages: Arc<Mutex<Vec<(String, String)>>>,
    pub should_fail: AtomicBool,
    pub should_decline: AtomicBool,
}

impl RecordingMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let transport = Self::default();
        transport.should_fail.store(true, Ordering::SeqCst);
        transport
    }

    pub fn declining() -> Self {
        let transport = Self::default();
        transport.should_decline.store(true, Ordering::SeqCst);
        transport
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<(String, String)> {
        self.sent_messages.lock().unwrap().last().cloned()
    }

    /// Code contained in the most recent message body
    pub fn last_code(&self) -> Option<String> {
        let (_, body) = self.last_message()?;
        body.lines()
            .find_map(|line| line.strip_prefix("Your one-time passcode is: "))
            .map(str::to_string)
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, address: &str, body: &str) -> Result<bool, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("SMTP relay unavailable".to_string());
        }
        if self.should_decline.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.sent_messages
            .lock()
            .unwrap()
            .push((address.to_string(), body.to_string()));
        Ok(true)
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

// Panics inside the background task
pub struct PanickingMailTransport;

#[async_trait]
impl MailTransport for PanickingMailTransport {
    async fn send(&self, _address: &str, _body: &str) -> Result<bool, String> {
        panic!("transport exploded");
    }

    fn provider_name(&self) -> &str {
        "panicking"
    }
}

// Never completes
pub struct HangingMailTransport;

#[async_trait]
impl MailTransport for HangingMailTransport {
    async fn send(&self, _address: &str, _body: &str) -> Result<bool, String> {
        std::future::pending::<()>().await;
        Ok(true)
    }

    fn provider_name(&self) -> &str {
        "hanging"
    }
}
