//! Long-running operation polling.
//!
//! A [`Poller`] drives any [`PollerType`] until it reports a terminal
//! state, sleeping between polls and honoring the caller's [`Context`].

mod delete;
mod long_running;
mod provisioning_state;

pub use delete::DeletePoller;
pub use long_running::LongRunningPoller;
pub use provisioning_state::ProvisioningStatePoller;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::client::{ClientError, Response};
use crate::context::{Context, ContextError};
use crate::models::ProvisioningState;

pub const DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingStatus {
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
}

impl PollingStatus {
    /// Maps an operation `status` or `provisioningState` value. Anything
    /// that is not terminal is still in progress.
    pub fn from_status_str(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("succeeded") {
            PollingStatus::Succeeded
        } else if status.eq_ignore_ascii_case("failed") {
            PollingStatus::Failed
        } else if status.eq_ignore_ascii_case("canceled") || status.eq_ignore_ascii_case("cancelled")
        {
            PollingStatus::Cancelled
        } else {
            PollingStatus::InProgress
        }
    }

    pub fn is_terminal(self) -> bool {
        self != PollingStatus::InProgress
    }
}

/// The outcome of a single poll.
#[derive(Debug, Clone)]
pub struct PollResult {
    pub status: PollingStatus,
    /// Overrides the next wait, typically from `Retry-After`.
    pub poll_interval: Option<Duration>,
    pub response: Option<Response>,
}

impl PollResult {
    pub fn new(status: PollingStatus) -> Self {
        Self {
            status,
            poll_interval: None,
            response: None,
        }
    }

    fn from_response(status: PollingStatus, response: Response) -> Self {
        Self {
            status,
            poll_interval: response.retry_after(),
            response: Some(response),
        }
    }
}

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("the long-running operation failed: {body}")]
    Failed { body: String },

    #[error("the long-running operation was cancelled: {body}")]
    Cancelled { body: String },

    #[error("unexpected status {status} while polling: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("connection dropped while polling: {0}")]
    DroppedConnection(String),

    #[error("giving up after {count} dropped connections, last: {last}")]
    TooManyDroppedConnections { count: usize, last: String },

    #[error("polling request failed: {0}")]
    Request(String),

    #[error("decoding poll response: {0}")]
    Decode(String),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl PollerError {
    /// Maps an error from the request layer. Network failures count as
    /// dropped connections.
    pub(crate) fn from_client(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => PollerError::DroppedConnection(e.to_string()),
            ClientError::Context(e) => PollerError::Context(e),
            ClientError::Decode { message, .. } => PollerError::Decode(message),
            ClientError::Polling(e) => e,
            other => PollerError::Request(other.to_string()),
        }
    }
}

/// One way of checking whether an operation has finished.
#[async_trait]
pub trait PollerType: Send + Sync {
    async fn poll(&self, ctx: &Context) -> Result<PollResult, PollerError>;
}

/// Polls a [`PollerType`] until it reaches a terminal state.
pub struct Poller {
    poller_type: Box<dyn PollerType>,
    poll_interval: Duration,
    initial_delay: Duration,
    max_dropped_connections: usize,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("poll_interval", &self.poll_interval)
            .field("initial_delay", &self.initial_delay)
            .field("max_dropped_connections", &self.max_dropped_connections)
            .finish_non_exhaustive()
    }
}

impl Poller {
    pub fn new(
        poller_type: impl PollerType + 'static,
        poll_interval: Duration,
        max_dropped_connections: usize,
    ) -> Self {
        Self {
            poller_type: Box::new(poller_type),
            poll_interval,
            initial_delay: poll_interval,
            max_dropped_connections,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sleeps, polls, and repeats until the operation is terminal. Returns
    /// the final response on success.
    pub async fn poll_until_done(self, ctx: &Context) -> Result<Option<Response>, PollerError> {
        let mut wait = self.initial_delay;
        let mut dropped = 0usize;
        let mut attempt = 0usize;

        loop {
            ctx.sleep(wait).await?;
            attempt += 1;

            let result = match self.poller_type.poll(ctx).await {
                Ok(result) => result,
                Err(PollerError::DroppedConnection(message)) => {
                    dropped += 1;
                    tracing::debug!(attempt, dropped, error = %message, "dropped connection while polling");
                    if dropped > self.max_dropped_connections {
                        return Err(PollerError::TooManyDroppedConnections {
                            count: dropped,
                            last: message,
                        });
                    }
                    wait = self.poll_interval;
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::debug!(attempt, status = ?result.status, "polled long-running operation");

            match result.status {
                PollingStatus::Succeeded => return Ok(result.response),
                PollingStatus::Failed => {
                    return Err(PollerError::Failed {
                        body: body_of(result.response),
                    });
                }
                PollingStatus::Cancelled => {
                    return Err(PollerError::Cancelled {
                        body: body_of(result.response),
                    });
                }
                PollingStatus::InProgress => {
                    wait = result.poll_interval.unwrap_or(self.poll_interval);
                }
            }
        }
    }
}

fn body_of(response: Option<Response>) -> String {
    response.map(|r| r.body).unwrap_or_default()
}

/// Reads `properties.provisioningState`, falling back to a top-level
/// `provisioningState`.
pub fn provisioning_state(body: &Value) -> Option<ProvisioningState> {
    body.pointer("/properties/provisioningState")
        .or_else(|| body.get("provisioningState"))
        .and_then(Value::as_str)
        .map(ProvisioningState::from)
}

/// Reads the status of an async operation body: `status` first, then the
/// provisioning state.
fn operation_status(body: &Value) -> Option<PollingStatus> {
    body.get("status")
        .and_then(Value::as_str)
        .map(PollingStatus::from_status_str)
        .or_else(|| {
            provisioning_state(body).map(|state| PollingStatus::from_status_str(state.as_str()))
        })
}
