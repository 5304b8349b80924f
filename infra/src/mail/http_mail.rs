//! HTTP mail transport for a transactional mail API
//!
//! Sends a JSON POST in the Brevo `smtp/email` shape:
//! `{"sender": {...}, "to": [{...}], "subject": "...", "textContent": "..."}`.
//! Any 2xx status is a successful hand-off.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use bh_core::services::MailTransport;
use bh_shared::config::MailConfig;
use bh_shared::utils::email::mask_email;

use crate::InfrastructureError;

/// Mail address with an optional display name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request body of the send endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    pub sender: MailAddress,
    pub to: Vec<MailAddress>,
    pub subject: String,
    pub text_content: String,
}

fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Mail transport backed by an HTTP mail API
#[derive(Clone)]
pub struct HttpMailTransport {
    /// HTTP client with the configured timeout
    client: reqwest::Client,
    /// API endpoint and credentials
    config: MailConfig,
}

impl HttpMailTransport {
    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// `InfrastructureError::Config` when the API key or sender is missing
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        if !config.has_credentials() {
            return Err(InfrastructureError::Config(
                "mail API key and sender email are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("BakeHouse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the request body for one recipient
    pub fn build_request(&self, to: &str, body: &str) -> SendMailRequest {
        SendMailRequest {
            sender: MailAddress {
                email: self.config.sender_email.trim().to_string(),
                name: self.config.sender_name.clone(),
            },
            to: vec![MailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: self.config.subject.clone(),
            text_content: body.to_string(),
        }
    }

    async fn post(&self, request: &SendMailRequest) -> Result<(), InfrastructureError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", self.config.api_key.trim())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if is_success_status(status) {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(InfrastructureError::Mail(format!(
            "send failed (status={}): {}",
            status, body
        )))
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, address: &str, body: &str) -> Result<bool, String> {
        let request = self.build_request(address, body);

        match self.post(&request).await {
            Ok(()) => {
                tracing::debug!(
                    provider = "http",
                    address = %mask_email(address),
                    "Mail API accepted message"
                );
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(
                    provider = "http",
                    address = %mask_email(address),
                    error = %e,
                    "Mail API rejected message"
                );
                Err(e.to_string())
            }
        }
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}
