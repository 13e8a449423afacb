use thiserror::Error;

use super::Response;
use crate::context::ContextError;
use crate::pollers::PollerError;

/// Errors raised while talking to Azure Resource Manager.
///
/// SECURITY: Error messages must NEVER contain the access token.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The token could not be turned into an Authorization header.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// The API answered with a status the operation did not expect.
    #[error("unexpected status {status} with error: {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        response: Box<Response>,
    },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decoding response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("encoding request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("polling: {0}")]
    Polling(#[from] PollerError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn was_status_code(&self, status: u16) -> bool {
        self.status() == Some(status)
    }

    pub fn was_not_found(&self) -> bool {
        self.was_status_code(404)
    }

    pub fn was_forbidden(&self) -> bool {
        self.was_status_code(403)
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            ClientError::Api { response, .. } => Some(response),
            _ => None,
        }
    }
}
