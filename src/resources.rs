//! Resource adapters.
//!
//! Each adapter maps one resource type's flat configuration onto ARM calls
//! made through [`Clients`].

mod app_configuration;
mod diagnostic_setting;
mod resource_group;

pub use app_configuration::AppConfigurationResource;
pub use diagnostic_setting::DiagnosticSettingResource;
pub use resource_group::ResourceGroupResource;

use std::fmt::Display;

use async_trait::async_trait;
use thiserror::Error;

use crate::client::ClientError;
use crate::clients::Clients;
use crate::context::Context;
use crate::resourceids::ParseError;
use crate::terraform::{ResourceData, Schema};
use crate::validate::{Diagnostics, ValidationError};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(
        "A resource with the ID {id:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for {type_name:?} for more information."
    )]
    AlreadyExists { id: String, type_name: &'static str },

    #[error("cannot import non-existent remote object {id:?}")]
    ImportNotFound { id: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{operation} {target}: {source}")]
    Operation {
        operation: &'static str,
        target: String,
        source: ClientError,
    },

    #[error(
        "deleting {target}: the Resource Group still contains Resources.\n\nThe following Resources still exist within the Resource Group:\n\n{}\n\nRemove these Resources, or disable `prevent_deletion_if_contains_resources` in the provider features.",
        bullet_list(.resources)
    )]
    ContainsResources {
        target: String,
        resources: Vec<String>,
    },

    #[error("{operation} {target}: {message}")]
    Invalid {
        operation: &'static str,
        target: String,
        message: String,
    },
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("* `{item}`"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResourceError {
    /// Wraps a client error with the operation and the resource it targeted,
    /// e.g. `creating Configuration Store (...): ...`.
    pub fn operation(
        operation: &'static str,
        target: &impl Display,
    ) -> impl FnOnce(ClientError) -> ResourceError {
        let target = target.to_string();
        move |source| ResourceError::Operation {
            operation,
            target,
            source,
        }
    }

    pub fn invalid(operation: &'static str, target: &impl Display, message: impl Into<String>) -> Self {
        ResourceError::Invalid {
            operation,
            target: target.to_string(),
            message: message.into(),
        }
    }
}

/// CRUD for one resource type.
///
/// `read` clears the ID when the remote object is gone instead of failing.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Local checks only; never touches the network.
    fn validate(&self, config: &ResourceData) -> Diagnostics {
        self.schema().validate(config)
    }

    /// Attributes whose change cannot be applied in place.
    fn requires_replace(&self, prior: &ResourceData, config: &ResourceData) -> Vec<&'static str> {
        self.schema().force_new_changes(prior, config)
    }

    /// Checks that `id` is the right kind of ID for this resource.
    fn validate_id(&self, id: &str) -> Result<(), ParseError>;

    async fn create(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError>;

    async fn read(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError>;

    async fn update(
        &self,
        clients: &Clients,
        ctx: &Context,
        prior: &ResourceData,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError>;

    async fn delete(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &ResourceData,
    ) -> Result<(), ResourceError>;

    async fn import(
        &self,
        clients: &Clients,
        ctx: &Context,
        id: &str,
    ) -> Result<ResourceData, ResourceError> {
        self.validate_id(id)?;
        let mut data = ResourceData::default();
        data.set_id(id);
        self.read(clients, ctx, &mut data).await?;
        if data.is_gone() {
            return Err(ResourceError::ImportNotFound { id: id.to_string() });
        }
        Ok(data)
    }
}

/// Brings the remote object in line with `config`: creates it when there is
/// no prior state, replaces it when a `force_new` attribute changed and
/// updates it in place otherwise. Returns the new state.
pub async fn apply(
    resource: &dyn Resource,
    clients: &Clients,
    ctx: &Context,
    prior: Option<&ResourceData>,
    mut config: ResourceData,
) -> Result<ResourceData, ResourceError> {
    let diags = resource.validate(&config);
    if !diags.is_valid() {
        return Err(ResourceError::Validation(diags.errors));
    }
    for warning in &diags.warnings {
        tracing::warn!(resource = resource.type_name(), "{}", warning);
    }

    let schema = resource.schema();
    schema.apply_defaults(&mut config);
    schema.normalize(&mut config);

    let Some(prior) = prior.filter(|p| !p.is_gone()) else {
        config.set_id("");
        resource.create(clients, ctx, &mut config).await?;
        return Ok(config);
    };

    let replace = resource.requires_replace(prior, &config);
    if !replace.is_empty() {
        tracing::info!(
            resource = resource.type_name(),
            id = %prior.id(),
            attributes = ?replace,
            "replacing resource"
        );
        resource.delete(clients, ctx, prior).await?;
        config.set_id("");
        resource.create(clients, ctx, &mut config).await?;
        return Ok(config);
    }

    config.set_id(prior.id());
    resource.update(clients, ctx, prior, &mut config).await?;
    Ok(config)
}

pub fn resource_types() -> &'static [&'static str] {
    &[
        "azurerm_app_configuration",
        "azurerm_monitor_diagnostic_setting",
        "azurerm_resource_group",
    ]
}

pub fn get_resource(type_name: &str) -> Result<Box<dyn Resource>, ResourceError> {
    match type_name {
        "azurerm_app_configuration" => Ok(Box::new(AppConfigurationResource)),
        "azurerm_monitor_diagnostic_setting" => Ok(Box::new(DiagnosticSettingResource)),
        "azurerm_resource_group" => Ok(Box::new(ResourceGroupResource)),
        other => Err(ResourceError::UnknownResourceType(other.to_string())),
    }
}
