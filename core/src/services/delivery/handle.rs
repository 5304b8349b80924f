//! Future returned by a delivery request

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::domain::value_objects::DeliveryResult;

/// Pending outcome of a delivery request
///
/// Resolves exactly once. A background task that panicked or was aborted
/// resolves to a `System error` result instead of propagating the fault.
/// Dropping the handle does not cancel the delivery.
#[derive(Debug)]
pub struct DeliveryHandle {
    state: State,
}

#[derive(Debug)]
enum State {
    Running(JoinHandle<DeliveryResult>),
    /// Outcome known without spawning; taken on first poll
    Resolved(Option<DeliveryResult>),
}

impl DeliveryHandle {
    pub(crate) fn new(task: JoinHandle<DeliveryResult>) -> Self {
        Self {
            state: State::Running(task),
        }
    }

    pub(crate) fn resolved(result: DeliveryResult) -> Self {
        Self {
            state: State::Resolved(Some(result)),
        }
    }

    /// Cancel the background delivery
    ///
    /// The handle then resolves to a `System error` result unless the task
    /// had already finished.
    pub fn abort(&self) {
        if let State::Running(task) = &self.state {
            task.abort();
        }
    }

    /// Whether the background task has finished
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Running(task) => task.is_finished(),
            State::Resolved(_) => true,
        }
    }
}

impl Future for DeliveryHandle {
    type Output = DeliveryResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let task = match &mut self.get_mut().state {
            State::Running(task) => task,
            State::Resolved(result) => {
                return Poll::Ready(
                    result
                        .take()
                        .unwrap_or_else(|| DeliveryResult::system_error("delivery already resolved")),
                );
            }
        };
        match Pin::new(task).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => {
                let description = if e.is_cancelled() {
                    "delivery cancelled".to_string()
                } else {
                    "delivery task panicked".to_string()
                };
                tracing::error!(
                    error = %e,
                    event = "otp_delivery_failed",
                    "Delivery task did not complete"
                );
                Poll::Ready(DeliveryResult::system_error(description))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
