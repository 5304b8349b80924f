//! Delivery dispatcher: resolve, issue, compose, send

use std::sync::Arc;
use tokio::runtime::Handle;

use bh_shared::config::DeliveryConfig;
use bh_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::value_objects::DeliveryResult;
use crate::repositories::account::r#trait::Directory;
use crate::repositories::otp::r#trait::OtpStore;
use crate::services::otp::OtpLedger;

use super::handle::DeliveryHandle;
use super::traits::MailTransport;

/// Append the code and its validity statement to a message template
pub fn compose_message(template: &str, code: &str, validity_minutes: i64) -> String {
    format!(
        "{}\n\nYour one-time passcode is: {}\nThis code is valid for {} minutes.",
        template.trim_end(),
        code,
        validity_minutes
    )
}

/// Delivers one-time passcodes by email on background tasks
///
/// Every request resolves to a `DeliveryResult`; faults never reach the caller
/// as errors or panics. Unknown, invalid and throttled addresses resolve to
/// the same response as a delivered code, after spending the same hashing
/// work. The transport call is only made for real deliveries, so callers must
/// not expose how long a request took to resolve.
pub struct DeliveryDispatcher<D: Directory, S: OtpStore, M: MailTransport + ?Sized> {
    /// Address to account lookup
    directory: Arc<D>,
    /// Passcode issuance
    ledger: Arc<OtpLedger<S>>,
    /// Outgoing mail
    transport: Arc<M>,
    /// Delivery configuration
    config: DeliveryConfig,
    /// Runtime the delivery tasks are spawned on
    runtime: Option<Handle>,
}

impl<D: Directory, S: OtpStore, M: MailTransport + ?Sized> Clone for DeliveryDispatcher<D, S, M> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            ledger: self.ledger.clone(),
            transport: self.transport.clone(),
            config: self.config.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<D, S, M> DeliveryDispatcher<D, S, M>
where
    D: Directory + 'static,
    S: OtpStore + 'static,
    M: MailTransport + ?Sized + 'static,
{
    /// Create a new dispatcher
    ///
    /// Captures the current tokio runtime, if any, so that requests can later
    /// be made from threads outside it.
    ///
    /// # Arguments
    ///
    /// * `directory` - Directory implementation
    /// * `ledger` - OTP ledger shared with the verification path
    /// * `transport` - Mail transport implementation
    /// * `config` - Delivery configuration
    pub fn new(
        directory: Arc<D>,
        ledger: Arc<OtpLedger<S>>,
        transport: Arc<M>,
        config: DeliveryConfig,
    ) -> Self {
        Self {
            directory,
            ledger,
            transport,
            config,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Spawn delivery tasks on an explicit runtime
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Ledger used for issuance
    pub fn ledger(&self) -> &Arc<OtpLedger<S>> {
        &self.ledger
    }

    /// Request delivery of a fresh passcode to an address
    ///
    /// Returns immediately; the work runs on a spawned tokio task. The task
    /// goes to the runtime captured at construction, else the caller's
    /// runtime. With neither available the handle resolves to a
    /// `System error` result.
    ///
    /// # Arguments
    ///
    /// * `address` - Recipient email address as entered by the user
    /// * `message_template` - Message text the code and validity statement are appended to
    pub fn request_otp_delivery(&self, address: &str, message_template: &str) -> DeliveryHandle {
        let dispatcher = self.clone();
        let address = address.to_string();
        let template = message_template.to_string();

        tracing::info!(
            address = %mask_email(&address),
            event = "otp_delivery_requested",
            "OTP delivery requested"
        );

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::error!(
                event = "otp_delivery_failed",
                "No tokio runtime available for OTP delivery"
            );
            return DeliveryHandle::resolved(DeliveryResult::system_error(
                "no async runtime available",
            ));
        };

        DeliveryHandle::new(runtime.spawn(async move {
            dispatcher.deliver(&address, &template).await
        }))
    }

    async fn deliver(&self, address: &str, template: &str) -> DeliveryResult {
        let address = normalize_email(address);
        let masked = mask_email(&address);

        if !is_valid_email(&address) {
            tracing::info!(
                address = %masked,
                reason = "invalid",
                event = "otp_delivery_unknown_address",
                "Delivery address rejected"
            );
            self.ledger.issue_decoy();
            return DeliveryResult::accepted();
        }

        let user_id = match self.directory.resolve_user_id_by_address(&address).await {
            Ok(Some(user_id)) => user_id,
            Ok(None) => {
                tracing::info!(
                    address = %masked,
                    reason = "unknown",
                    event = "otp_delivery_unknown_address",
                    "No account for delivery address"
                );
                self.ledger.issue_decoy();
                return DeliveryResult::accepted();
            }
            Err(e) => {
                tracing::error!(
                    address = %masked,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Directory lookup failed"
                );
                return DeliveryResult::system_error(e);
            }
        };

        let cooldown = self.config.resend_cooldown_seconds.max(0) as u64;
        if cooldown > 0 {
            match self.ledger.reserve_issue(user_id, cooldown).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(
                        user_id = user_id,
                        cooldown_seconds = cooldown,
                        event = "otp_delivery_throttled",
                        "OTP requested again within the resend cooldown"
                    );
                    self.ledger.issue_decoy();
                    return DeliveryResult::accepted();
                }
                Err(e) => {
                    tracing::error!(
                        user_id = user_id,
                        error = %e,
                        event = "otp_delivery_failed",
                        "Failed to reserve the resend window"
                    );
                    return DeliveryResult::failure(e.to_string());
                }
            }
        }

        let issued = match self.ledger.issue(user_id).await {
            Ok(issued) => issued,
            Err(e) => {
                tracing::error!(
                    user_id = user_id,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to issue OTP"
                );
                // Nothing was issued, so the window is not spent
                if cooldown > 0 {
                    if let Err(e) = self.ledger.release_issue(user_id).await {
                        tracing::warn!(
                            user_id = user_id,
                            error = %e,
                            "Failed to release the resend window"
                        );
                    }
                }
                return DeliveryResult::failure(e.to_string());
            }
        };

        let body = compose_message(template, &issued.code, self.ledger.validity_minutes());

        match self.transport.send(&address, &body).await {
            Ok(true) => {
                tracing::info!(
                    user_id = user_id,
                    address = %masked,
                    provider = self.transport.provider_name(),
                    event = "otp_delivery_sent",
                    "OTP delivered to mail transport"
                );
                DeliveryResult::accepted()
            }
            Ok(false) => {
                tracing::warn!(
                    user_id = user_id,
                    address = %masked,
                    provider = self.transport.provider_name(),
                    event = "otp_delivery_failed",
                    "Mail transport declined the message"
                );
                DeliveryResult::failure("Failed to send OTP email")
            }
            Err(e) => {
                tracing::error!(
                    user_id = user_id,
                    address = %masked,
                    provider = self.transport.provider_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Mail transport error"
                );
                DeliveryResult::failure(format!("Failed to send OTP email: {}", e))
            }
        }
    }
}
