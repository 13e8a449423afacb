use async_trait::async_trait;
use serde_json::json;

use super::{Resource, ResourceError};
use crate::clients::{Clients, RESOURCES_API_VERSION};
use crate::context::Context;
use crate::models::{GenericResource, ResourceGroup, normalize_location};
use crate::resourceids::{ParseError, ResourceGroupId, ResourceId};
use crate::terraform::{self, Attribute, AttributeType, ResourceData, Schema};
use crate::validate;

/// `azurerm_resource_group`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceGroupResource;

impl ResourceGroupResource {
    fn id_from_config(clients: &Clients, data: &ResourceData) -> ResourceGroupId {
        ResourceGroupId::new(
            clients.account.subscription_id.as_str(),
            data.get_str("name").unwrap_or_default(),
        )
    }
}

#[async_trait]
impl Resource for ResourceGroupResource {
    fn type_name(&self) -> &'static str {
        "azurerm_resource_group"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("name", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::resource_group_name)),
            terraform::location(),
            Attribute::optional("managed_by", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::string_is_not_empty)),
            Attribute::optional("tags", AttributeType::Map),
        ])
    }

    fn validate_id(&self, id: &str) -> Result<(), ParseError> {
        ResourceGroupId::parse(id).map(|_| ())
    }

    async fn create(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_create(ctx);
        let client = &clients.resource.resource_groups;
        let id = Self::id_from_config(clients, data);

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

        let model = ResourceGroup {
            location: normalize_location(data.get_str("location").unwrap_or_default()),
            managed_by: data.get_str("managed_by").map(str::to_string),
            tags: Some(data.get_string_map("tags")),
            ..Default::default()
        };

        tracing::info!(id = %id, "creating resource group");
        client
            .create_or_update(&ctx, &id, &model)
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
        let id = ResourceGroupId::parse_insensitively(data.id())?;

        let model = match clients.resource.resource_groups.get(&ctx, &id).await {
            Ok(model) => model,
            Err(e) if e.was_not_found() => {
                tracing::debug!(id = %id, "resource group was not found - removing from state");
                data.set_id("");
                return Ok(());
            }
            Err(e) => return Err(ResourceError::operation("retrieving", &id)(e)),
        };

        data.set("name", id.resource_group_name.as_str());
        data.set("location", normalize_location(&model.location));
        data.set_opt("managed_by", model.managed_by);
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
        let id = ResourceGroupId::parse(data.id())?;

        if prior.has_change(data, "tags") {
            let patch = json!({ "tags": data.get_string_map("tags") });
            clients
                .resource
                .resource_groups
                .update_then_poll(&ctx, &id, &patch)
                .await
                .map_err(ResourceError::operation("updating", &id))?;
        }

        self.read(clients, &ctx, data).await
    }

    async fn delete(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_delete(ctx);
        let id = ResourceGroupId::parse(data.id())?;

        if clients
            .features
            .resource_group
            .prevent_deletion_if_contains_resources
        {
            let path = format!("{}/resources", id.id());
            let nested: Vec<GenericResource> = clients
                .resource
                .client
                .list_complete(&ctx, &path, RESOURCES_API_VERSION)
                .await
                .map_err(ResourceError::operation("listing resources in", &id))?;

            let nested: Vec<String> = nested.into_iter().filter_map(|r| r.id).collect();
            if !nested.is_empty() {
                return Err(ResourceError::ContainsResources {
                    target: id.to_string(),
                    resources: nested,
                });
            }
        }

        tracing::info!(id = %id, "deleting resource group");
        clients
            .resource
            .resource_groups
            .delete_then_poll(&ctx, &id)
            .await
            .map_err(ResourceError::operation("deleting", &id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn config(value: Value) -> ResourceData {
        serde_json::from_value(json!({ "attributes": value })).unwrap()
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        let diags = ResourceGroupResource.validate(&config(json!({
            "name": "example-resources",
            "location": "West Europe"
        })));
        assert!(diags.is_valid(), "{:?}", diags);
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        let diags = ResourceGroupResource.validate(&config(json!({
            "name": "example.",
            "location": "westeurope"
        })));
        assert!(!diags.is_valid());
        assert_eq!(diags.errors[0].key, "name");
    }

    #[test]
    fn test_validate_id() {
        assert!(
            ResourceGroupResource
                .validate_id("/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/example")
                .is_ok()
        );
        assert!(
            ResourceGroupResource
                .validate_id("/subscriptions/12345678-1234-9876-4563-123456789012")
                .is_err()
        );
    }
}
