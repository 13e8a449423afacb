//! azurerm - a thin, generic Azure Resource Manager client layer
//!
//! Typed resource IDs, schema validators, long-running-operation pollers,
//! paginated list clients and a handful of resource adapters built on them.

pub mod client;
pub mod clients;
pub mod config;
pub mod context;
pub mod models;
pub mod output;
pub mod pollers;
pub mod resourceids;
pub mod resources;
pub mod terraform;
pub mod validate;

mod error;

pub use client::{Client, ClientError, ResourceClient};
pub use clients::Clients;
pub use config::ProviderConfig;
pub use context::Context;
pub use error::AzureRmError;
pub use resourceids::{ParseError, ResourceId};
pub use resources::{Resource, ResourceError};
