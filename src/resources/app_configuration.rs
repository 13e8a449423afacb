use async_trait::async_trait;
use serde_json::json;

use super::{Resource, ResourceError};
use crate::client::ClientError;
use crate::clients::{APP_CONFIGURATION_API_VERSION, Clients};
use crate::context::Context;
use crate::models::{
    AuthenticationMode, ConfigurationStore, ConfigurationStoreProperties,
    ConfigurationStorePropertiesUpdate, ConfigurationStoreSku, ConfigurationStoreUpdate,
    CreateMode, DataPlaneProxyProperties, PrivateLinkDelegation, PublicNetworkAccess, Sku,
    normalize_location,
};
use crate::pollers::{DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW, DeletePoller, Poller};
use crate::resourceids::{ConfigurationStoreId, DeletedConfigurationStoreId, ParseError, ResourceId};
use crate::terraform::{self, Attribute, AttributeType, ResourceData, Schema};
use crate::validate::{self, Diagnostics};

const DEFAULT_SOFT_DELETE_RETENTION_DAYS: i64 = 7;

/// `azurerm_app_configuration`
#[derive(Debug, Clone, Copy, Default)]
pub struct AppConfigurationResource;

fn missing_permission_message(name: &str, location: &str) -> String {
    format!(
        "An existing soft-deleted App Configuration exists with the Name {name:?} in the location {location:?}, however \
         the credentials in use have insufficient permissions to check for an existing soft-deleted App Configuration. \
         You can opt out of this behaviour with the `recover_soft_deleted` feature flag."
    )
}

fn private_link_delegation(data: &ResourceData) -> PrivateLinkDelegation {
    if data
        .get_bool("data_plane_proxy_private_link_delegation_enabled")
        .unwrap_or(false)
    {
        PrivateLinkDelegation::Enabled
    } else {
        PrivateLinkDelegation::Disabled
    }
}

/// Moving from a production tier (`standard`, `premium`) down to
/// `developer`, or to `free` from anything, needs a new store.
fn is_sku_downgrade(old: &str, new: &str) -> bool {
    let old = ConfigurationStoreSku::from(old);
    let new = ConfigurationStoreSku::from(new);
    if old == new {
        return false;
    }
    matches!(
        (&old, &new),
        (ConfigurationStoreSku::Premium | ConfigurationStoreSku::Standard, ConfigurationStoreSku::Developer)
    ) || new == ConfigurationStoreSku::Free
}

#[async_trait]
impl Resource for AppConfigurationResource {
    fn type_name(&self) -> &'static str {
        "azurerm_app_configuration"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("name", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::configuration_store_name)),
            Attribute::required("resource_group_name", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::resource_group_name)),
            terraform::location(),
            Attribute::optional("sku", AttributeType::String)
                .default("free")
                .validate(validate::string_in_slice(
                    ConfigurationStoreSku::possible_values(),
                    false,
                )),
            Attribute::optional("data_plane_proxy_authentication_mode", AttributeType::String)
                .default("Local")
                .validate(validate::string_in_slice(
                    AuthenticationMode::possible_values(),
                    false,
                )),
            Attribute::optional("data_plane_proxy_private_link_delegation_enabled", AttributeType::Bool)
                .default(false),
            Attribute::optional("local_auth_enabled", AttributeType::Bool).default(true),
            Attribute::optional("public_network_access", AttributeType::String).validate(
                validate::string_in_slice(PublicNetworkAccess::possible_values(), true),
            ),
            Attribute::optional("purge_protection_enabled", AttributeType::Bool).default(false),
            // read stores 0 when the API omits the retention
            Attribute::optional("soft_delete_retention_days", AttributeType::Int)
                .force_new()
                .default(DEFAULT_SOFT_DELETE_RETENTION_DAYS)
                .validate(validate::int_between(1, 7))
                .diff_suppress(|old, _| old.as_i64() == Some(0)),
            Attribute::optional("tags", AttributeType::Map),
            Attribute::computed("endpoint", AttributeType::String),
        ])
    }

    fn validate(&self, config: &ResourceData) -> Diagnostics {
        let mut diags = self.schema().validate(config);
        let mode = config
            .get_str("data_plane_proxy_authentication_mode")
            .map_or(AuthenticationMode::Local, AuthenticationMode::from);
        if mode == AuthenticationMode::Local && private_link_delegation(config) == PrivateLinkDelegation::Enabled {
            diags.error(
                "data_plane_proxy_private_link_delegation_enabled",
                "`data_plane_proxy_private_link_delegation_enabled` cannot be set to `true` when `data_plane_proxy_authentication_mode` is `Local`",
            );
        }
        diags
    }

    fn requires_replace(&self, prior: &ResourceData, config: &ResourceData) -> Vec<&'static str> {
        let mut replace = self.schema().force_new_changes(prior, config);
        if let (Some(old), Some(new)) = (prior.get_str("sku"), config.get_str("sku")) {
            if is_sku_downgrade(old, new) {
                replace.push("sku");
            }
        }
        replace
    }

    fn validate_id(&self, id: &str) -> Result<(), ParseError> {
        ConfigurationStoreId::parse(id).map(|_| ())
    }

    async fn create(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_create(ctx);
        let client = &clients.app_configuration.configuration_stores;
        let subscription_id = clients.account.subscription_id.as_str();
        let name = data.get_str("name").unwrap_or_default();
        let id = ConfigurationStoreId::new(
            subscription_id,
            data.get_str("resource_group_name").unwrap_or_default(),
            name,
        );

        match client.get(&ctx, &id).await {
            Ok(_) => {
                return Err(ResourceError::AlreadyExists {
                    id: id.id(),
                    type_name: self.type_name(),
                });
            }
            Err(e) if e.was_not_found() => {}
            Err(e) => {
                return Err(ResourceError::operation("checking for presence of existing", &id)(e));
            }
        }

        let location = normalize_location(data.get_str("location").unwrap_or_default());

        let mut recover_soft_deleted = false;
        if clients.features.app_configuration.recover_soft_deleted {
            let deleted_id = DeletedConfigurationStoreId::new(subscription_id, location.as_str(), name);
            match clients
                .app_configuration
                .deleted_configuration_stores
                .get(&ctx, &deleted_id)
                .await
            {
                Ok(_) => {
                    tracing::debug!(id = %deleted_id, "soft-deleted App Configuration exists, marked for recover");
                    recover_soft_deleted = true;
                }
                Err(e) if e.was_forbidden() => {
                    return Err(ResourceError::invalid(
                        "checking for presence of deleted",
                        &deleted_id,
                        missing_permission_message(name, &location),
                    ));
                }
                Err(e) if e.was_not_found() => {}
                Err(e) => {
                    return Err(ResourceError::operation("checking for presence of deleted", &deleted_id)(e));
                }
            }
        }

        let soft_delete_retention_days = data
            .get_i64("soft_delete_retention_days")
            .unwrap_or(DEFAULT_SOFT_DELETE_RETENTION_DAYS);

        let model = ConfigurationStore {
            id: None,
            name: None,
            location,
            sku: Sku {
                name: ConfigurationStoreSku::from(data.get_str("sku").unwrap_or("free")),
            },
            tags: Some(data.get_string_map("tags")),
            properties: Some(ConfigurationStoreProperties {
                create_mode: recover_soft_deleted.then_some(CreateMode::Recover),
                public_network_access: data.get_str("public_network_access").map(PublicNetworkAccess::from),
                disable_local_auth: Some(!data.get_bool("local_auth_enabled").unwrap_or(true)),
                enable_purge_protection: Some(data.get_bool("purge_protection_enabled").unwrap_or(false)),
                soft_delete_retention_in_days: (soft_delete_retention_days
                    != DEFAULT_SOFT_DELETE_RETENTION_DAYS)
                    .then_some(soft_delete_retention_days),
                data_plane_proxy: Some(DataPlaneProxyProperties {
                    authentication_mode: Some(AuthenticationMode::from(
                        data.get_str("data_plane_proxy_authentication_mode").unwrap_or("Local"),
                    )),
                    private_link_delegation: Some(private_link_delegation(data)),
                }),
                ..Default::default()
            }),
        };

        tracing::info!(id = %id, recover = recover_soft_deleted, "creating App Configuration");
        client
            .create_or_update_then_poll(&ctx, &id, &model)
            .await
            .map_err(ResourceError::operation("creating", &id))?;

        data.set_id(id.id());
        self.read(clients, &ctx, data).await
    }

    async fn read(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_read(ctx);
        let id = ConfigurationStoreId::parse(data.id())?;

        let model = match clients.app_configuration.configuration_stores.get(&ctx, &id).await {
            Ok(model) => model,
            Err(e) if e.was_not_found() => {
                tracing::debug!(id = %id, "App Configuration was not found - removing from state");
                data.set_id("");
                return Ok(());
            }
            Err(e) => return Err(ResourceError::operation("retrieving", &id)(e)),
        };

        data.set("name", id.configuration_store_name.as_str());
        data.set("resource_group_name", id.resource_group_name.as_str());
        data.set("location", normalize_location(&model.location));
        data.set("sku", model.sku.name.as_str());

        let properties = model.properties.unwrap_or_default();
        if let Some(proxy) = properties.data_plane_proxy {
            if let Some(mode) = proxy.authentication_mode {
                data.set("data_plane_proxy_authentication_mode", mode.as_str());
            }
            data.set(
                "data_plane_proxy_private_link_delegation_enabled",
                proxy.private_link_delegation == Some(PrivateLinkDelegation::Enabled),
            );
        }
        data.set_opt("endpoint", properties.endpoint);
        data.set_opt(
            "public_network_access",
            properties.public_network_access.map(|p| p.as_str().to_string()),
        );
        data.set(
            "local_auth_enabled",
            !properties.disable_local_auth.unwrap_or(false),
        );
        data.set(
            "purge_protection_enabled",
            properties.enable_purge_protection.unwrap_or(false),
        );
        data.set(
            "soft_delete_retention_days",
            properties.soft_delete_retention_in_days.unwrap_or(0),
        );
        data.set("tags", json!(model.tags.unwrap_or_default()));
        Ok(())
    }

    async fn update(
        &self,
        clients: &Clients,
        ctx: &Context,
        prior: &ResourceData,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_update(ctx);
        let client = &clients.app_configuration.configuration_stores;
        let id = ConfigurationStoreId::parse(data.id())?;

        let existing = client
            .get(&ctx, &id)
            .await
            .map_err(ResourceError::operation("retrieving", &id))?;
        let Some(existing_properties) = existing.properties else {
            return Err(ResourceError::invalid("retrieving", &id, "`properties` was nil"));
        };

        let mut update = ConfigurationStoreUpdate::default();
        let mut properties = ConfigurationStorePropertiesUpdate::default();
        let mut properties_changed = false;

        if prior.has_change(data, "sku") {
            update.sku = Some(Sku {
                name: ConfigurationStoreSku::from(data.get_str("sku").unwrap_or("free")),
            });
        }
        if prior.has_change(data, "tags") {
            update.tags = Some(data.get_string_map("tags"));
        }
        let mut data_plane_proxy = DataPlaneProxyProperties::default();
        if prior.has_change(data, "data_plane_proxy_authentication_mode") {
            data_plane_proxy.authentication_mode = data
                .get_str("data_plane_proxy_authentication_mode")
                .map(AuthenticationMode::from);
        }
        if prior.has_change(data, "data_plane_proxy_private_link_delegation_enabled") {
            data_plane_proxy.private_link_delegation = Some(private_link_delegation(data));
        }
        if data_plane_proxy != DataPlaneProxyProperties::default() {
            properties.data_plane_proxy = Some(data_plane_proxy);
            properties_changed = true;
        }
        if prior.has_change(data, "local_auth_enabled") {
            properties.disable_local_auth = Some(!data.get_bool("local_auth_enabled").unwrap_or(true));
            properties_changed = true;
        }
        if prior.has_change(data, "public_network_access") {
            properties.public_network_access = data
                .get_str("public_network_access")
                .map(PublicNetworkAccess::from);
            properties_changed = true;
        }
        if prior.has_change(data, "purge_protection_enabled") {
            let enabled = data.get_bool("purge_protection_enabled").unwrap_or(false);
            if existing_properties.enable_purge_protection.unwrap_or(false) && !enabled {
                return Err(ResourceError::invalid(
                    "updating",
                    &id,
                    "once Purge Protection has been Enabled it's not possible to disable it",
                ));
            }
            properties.enable_purge_protection = Some(enabled);
            properties_changed = true;
        }
        if properties_changed {
            update.properties = Some(properties);
        }

        client
            .update_then_poll(&ctx, &id, &update)
            .await
            .map_err(ResourceError::operation("updating", &id))?;

        self.read(clients, &ctx, data).await
    }

    async fn delete(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_delete(ctx);
        let client = &clients.app_configuration.configuration_stores;
        let id = ConfigurationStoreId::parse(data.id())?;

        let existing = match client.get(&ctx, &id).await {
            Ok(existing) => existing,
            Err(e) if e.was_not_found() => return Ok(()),
            Err(e) => return Err(ResourceError::operation("retrieving", &id)(e)),
        };
        let properties = existing.properties.unwrap_or_default();
        let purge_protection_enabled = properties.enable_purge_protection.unwrap_or(false);
        let soft_delete_enabled = properties
            .soft_delete_retention_in_days
            .is_some_and(|days| days > 0);

        client
            .delete_then_poll(&ctx, &id)
            .await
            .map_err(ResourceError::operation("deleting", &id))?;

        if !(clients.features.app_configuration.purge_soft_delete_on_destroy && soft_delete_enabled) {
            return Ok(());
        }

        let deleted_id = DeletedConfigurationStoreId::new(
            clients.account.subscription_id.as_str(),
            normalize_location(&existing.location),
            id.configuration_store_name.as_str(),
        );
        if purge_protection_enabled {
            tracing::debug!(id = %id, "purge protection is enabled, Azure will purge the store");
            return Ok(());
        }

        tracing::debug!(id = %deleted_id, "purging soft-deleted App Configuration");
        let deleted_client = &clients.app_configuration.deleted_configuration_stores;
        deleted_client
            .post(&ctx, &deleted_id, "purge", None)
            .await
            .map_err(ResourceError::operation("purging", &id))?;

        // the purge answers 200 with nothing to poll on, so wait for the
        // deleted store to disappear instead
        let raw = deleted_client.client().clone();
        let poller_type = DeletePoller::for_resource(raw.clone(), &deleted_id.id(), APP_CONFIGURATION_API_VERSION)
            .map_err(ResourceError::operation("purging", &id))?;
        Poller::new(
            poller_type,
            raw.poll_interval(),
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        )
        .poll_until_done(&ctx)
        .await
        .map_err(|e| ResourceError::operation("polling after purging", &id)(ClientError::Polling(e)))?;

        tracing::debug!(id = %id, "purged App Configuration");
        Ok(())
    }
}
