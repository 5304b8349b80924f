//! Asynchronous OTP delivery
//!
//! This module provides the delivery workflow:
//! - Address resolution with an anti-enumeration response
//! - Resend cooldown per account
//! - Code issuance through the OTP ledger
//! - Hand-off to a mail transport on a background task

mod dispatcher;
mod handle;
mod traits;

#[cfg(test)]
mod tests;

pub use dispatcher::{compose_message, DeliveryDispatcher};
pub use handle::DeliveryHandle;
pub use traits::MailTransport;
