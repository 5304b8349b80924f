//! Mail transport module
//!
//! Implementations of the core `MailTransport` trait:
//! - **Log transport**: logs masked deliveries for development
//! - **HTTP transport**: transactional mail API (Brevo-style JSON body)

use std::sync::Arc;

use bh_core::services::MailTransport;
use bh_shared::config::MailConfig;

pub mod http_mail;
pub mod mock_mail;

#[cfg(test)]
mod tests;

pub use http_mail::HttpMailTransport;
pub use mock_mail::LogMailTransport;

/// Create a mail transport based on configuration
///
/// Unknown providers and an HTTP transport that cannot be built fall back to
/// the log transport.
pub fn create_mail_transport(config: &MailConfig) -> Arc<dyn MailTransport> {
    match config.provider.as_str() {
        "mock" | "log" => Arc::new(LogMailTransport::new()),
        "http" | "brevo" => match HttpMailTransport::new(config) {
            Ok(transport) => Arc::new(transport),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize HTTP mail transport");
                tracing::warn!("Falling back to log mail transport");
                Arc::new(LogMailTransport::new())
            }
        },
        other => {
            tracing::warn!(
                provider = other,
                "Unknown mail provider, using log transport"
            );
            Arc::new(LogMailTransport::new())
        }
    }
}
