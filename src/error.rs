use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::context::ContextError;
use crate::pollers::PollerError;
use crate::resourceids::ParseError;
use crate::resources::ResourceError;

/// Every error the library can surface, for callers that want one type.
#[derive(Debug, Error)]
pub enum AzureRmError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Poller(#[from] PollerError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("unknown {kind} {name:?}")]
    Unknown { kind: &'static str, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
