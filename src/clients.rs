//! The set of service clients shared by every resource operation.

use crate::client::{Client, ClientError, ResourceClient};
use crate::config::{Features, ProviderConfig, Timeouts};
use crate::models::{ConfigurationStore, DeletedConfigurationStore, DiagnosticSettingsResource, ResourceGroup};
use crate::resourceids::{
    ConfigurationStoreId, DeletedConfigurationStoreId, DiagnosticSettingId, ResourceGroupId,
};

pub const RESOURCES_API_VERSION: &str = "2022-09-01";
pub const APP_CONFIGURATION_API_VERSION: &str = "2023-03-01";
pub const DIAGNOSTIC_SETTINGS_API_VERSION: &str = "2021-05-01-preview";

#[derive(Debug, Clone)]
pub struct Account {
    pub subscription_id: String,
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResourceClients {
    pub resource_groups: ResourceClient<ResourceGroupId, ResourceGroup>,
    /// For calls without a typed client, such as listing a group's resources.
    pub client: Client,
}

#[derive(Debug, Clone)]
pub struct AppConfigurationClients {
    pub configuration_stores: ResourceClient<ConfigurationStoreId, ConfigurationStore>,
    pub deleted_configuration_stores:
        ResourceClient<DeletedConfigurationStoreId, DeletedConfigurationStore>,
}

#[derive(Debug, Clone)]
pub struct MonitorClients {
    pub diagnostic_settings: ResourceClient<DiagnosticSettingId, DiagnosticSettingsResource>,
}

/// Built once from [`ProviderConfig`] and passed by reference to every
/// resource operation. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Clients {
    pub account: Account,
    pub features: Features,
    pub timeouts: Timeouts,
    pub resource: ResourceClients,
    pub app_configuration: AppConfigurationClients,
    pub monitor: MonitorClients,
}

impl Clients {
    pub fn build(config: &ProviderConfig) -> Result<Self, ClientError> {
        let client = Client::with_endpoint(config.access_token.clone(), config.endpoint().to_string())?;
        let account = Account {
            subscription_id: config.subscription_id.clone(),
            tenant_id: config.tenant_id.clone(),
        };
        Ok(Self::from_client(client, account, config.features, config.timeouts))
    }

    pub fn from_client(client: Client, account: Account, features: Features, timeouts: Timeouts) -> Self {
        tracing::debug!(endpoint = %client.endpoint(), subscription_id = %account.subscription_id, "building clients");
        Self {
            account,
            features,
            timeouts,
            resource: ResourceClients {
                resource_groups: ResourceClient::new(client.clone(), RESOURCES_API_VERSION),
                client: client.clone(),
            },
            app_configuration: AppConfigurationClients {
                configuration_stores: ResourceClient::new(
                    client.clone(),
                    APP_CONFIGURATION_API_VERSION,
                ),
                deleted_configuration_stores: ResourceClient::new(
                    client.clone(),
                    APP_CONFIGURATION_API_VERSION,
                ),
            },
            monitor: MonitorClients {
                diagnostic_settings: ResourceClient::new(client, DIAGNOSTIC_SETTINGS_API_VERSION),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uses_configured_endpoint() {
        let config = ProviderConfig {
            subscription_id: "12345678-1234-9876-4563-123456789012".to_string(),
            access_token: "token".to_string(),
            endpoint: Some("http://127.0.0.1:9999".to_string()),
            ..Default::default()
        };
        let clients = Clients::build(&config).unwrap();
        assert_eq!(clients.resource.client.endpoint(), "http://127.0.0.1:9999");
        assert_eq!(
            clients.app_configuration.configuration_stores.api_version(),
            APP_CONFIGURATION_API_VERSION
        );
        assert_eq!(
            clients.monitor.diagnostic_settings.api_version(),
            DIAGNOSTIC_SETTINGS_API_VERSION
        );
        assert_eq!(clients.account.subscription_id, config.subscription_id);
    }

    #[test]
    fn test_clients_are_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Clients>();
    }
}
