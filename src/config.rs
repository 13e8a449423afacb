//! Provider configuration: credentials, endpoints, feature flags and
//! operation timeouts.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::Context;
use crate::validate;

/// SECURITY: Error messages must NEVER contain the access token.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("unknown environment {0:?}, expected one of: public, usgovernment, china")]
    UnknownEnvironment(String),

    #[error("reading features file {path}: {message}")]
    FeaturesFile { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Public,
    UsGovernment,
    China,
}

impl Environment {
    pub fn resource_manager_endpoint(self) -> &'static str {
        match self {
            Environment::Public => "https://management.azure.com",
            Environment::UsGovernment => "https://management.usgovcloudapi.net",
            Environment::China => "https://management.chinacloudapi.cn",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "azurecloud" => Ok(Environment::Public),
            "usgovernment" | "azureusgovernmentcloud" => Ok(Environment::UsGovernment),
            "china" | "azurechinacloud" => Ok(Environment::China),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceGroupFeatures {
    pub prevent_deletion_if_contains_resources: bool,
}

impl Default for ResourceGroupFeatures {
    fn default() -> Self {
        Self {
            prevent_deletion_if_contains_resources: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigurationFeatures {
    pub purge_soft_delete_on_destroy: bool,
    pub recover_soft_deleted: bool,
}

impl Default for AppConfigurationFeatures {
    fn default() -> Self {
        Self {
            purge_soft_delete_on_destroy: true,
            recover_soft_deleted: true,
        }
    }
}

/// Behaviour switches, read from an optional JSON file. Missing keys keep
/// their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub resource_group: ResourceGroupFeatures,
    pub app_configuration: AppConfigurationFeatures,
}

impl Features {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FeaturesFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents).map_err(|e| ConfigError::FeaturesFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

impl Timeouts {
    pub fn for_create(&self, parent: &Context) -> Context {
        parent.with_timeout(self.create)
    }

    pub fn for_read(&self, parent: &Context) -> Context {
        parent.with_timeout(self.read)
    }

    pub fn for_update(&self, parent: &Context) -> Context {
        parent.with_timeout(self.update)
    }

    pub fn for_delete(&self, parent: &Context) -> Context {
        parent.with_timeout(self.delete)
    }
}

#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub subscription_id: String,
    pub tenant_id: Option<String>,
    pub access_token: String,
    pub environment: Environment,
    /// Overrides the environment's Resource Manager endpoint.
    pub endpoint: Option<String>,
    pub features: Features,
    pub timeouts: Timeouts,
}

impl ProviderConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.environment.resource_manager_endpoint())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subscription_id.trim().is_empty() {
            return Err(ConfigError::Missing("subscription_id"));
        }
        if let Some(err) = validate::is_uuid(&self.subscription_id, "subscription_id")
            .errors
            .into_iter()
            .next()
        {
            return Err(ConfigError::Invalid {
                field: "subscription_id",
                message: err.message,
            });
        }
        if let Some(tenant_id) = &self.tenant_id {
            if let Some(err) = validate::is_uuid(tenant_id, "tenant_id").errors.into_iter().next() {
                return Err(ConfigError::Invalid {
                    field: "tenant_id",
                    message: err.message,
                });
            }
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::Missing("access_token"));
        }
        if let Some(endpoint) = &self.endpoint {
            reqwest::Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
                field: "endpoint",
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("access_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .field("features", &self.features)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";

    fn config() -> ProviderConfig {
        ProviderConfig {
            subscription_id: SUBSCRIPTION.to_string(),
            access_token: "secret_token_value".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().endpoint(), "https://management.azure.com");
    }

    #[test]
    fn test_missing_subscription() {
        let cfg = ProviderConfig {
            subscription_id: String::new(),
            ..config()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Missing("subscription_id"))
        ));
    }

    #[test]
    fn test_invalid_subscription() {
        let cfg = ProviderConfig {
            subscription_id: "abc".to_string(),
            ..config()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "subscription_id",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_token() {
        let cfg = ProviderConfig {
            access_token: " ".to_string(),
            ..config()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Missing("access_token"))));
    }

    #[test]
    fn test_endpoint_override() {
        let cfg = ProviderConfig {
            endpoint: Some("http://127.0.0.1:8080".to_string()),
            environment: Environment::China,
            ..config()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.endpoint(), "http://127.0.0.1:8080");

        let bad = ProviderConfig {
            endpoint: Some("not a url".to_string()),
            ..config()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("public".parse::<Environment>().unwrap(), Environment::Public);
        assert_eq!(
            "AzureUSGovernmentCloud".parse::<Environment>().unwrap(),
            Environment::UsGovernment
        );
        assert_eq!(
            Environment::China.resource_manager_endpoint(),
            "https://management.chinacloudapi.cn"
        );
        assert!("mars".parse::<Environment>().is_err());
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let debug_output = format!("{:?}", config());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret_token_value"));
    }

    #[test]
    fn test_feature_defaults() {
        let features = Features::default();
        assert!(features.resource_group.prevent_deletion_if_contains_resources);
        assert!(features.app_configuration.purge_soft_delete_on_destroy);
        assert!(features.app_configuration.recover_soft_deleted);
    }

    #[test]
    fn test_features_partial_json_keeps_defaults() {
        let features = Features::from_json(
            r#"{"resource_group": {"prevent_deletion_if_contains_resources": false}}"#,
        )
        .unwrap();
        assert!(!features.resource_group.prevent_deletion_if_contains_resources);
        assert!(features.app_configuration.purge_soft_delete_on_destroy);
    }

    #[tokio::test]
    async fn test_timeouts_derive_deadlines() {
        let timeouts = Timeouts {
            read: Duration::from_secs(1),
            ..Default::default()
        };
        let parent = Context::background();
        let read = timeouts.for_read(&parent);
        let create = timeouts.for_create(&parent);
        assert!(read.deadline().unwrap() < create.deadline().unwrap());
    }
}
