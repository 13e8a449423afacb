use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Resource, ResourceError};
use crate::clients::Clients;
use crate::context::Context;
use crate::models::{DiagnosticSettings, DiagnosticSettingsResource, LogSettings, MetricSettings};
use crate::resourceids::{DiagnosticSettingId, ParseError, ResourceId};
use crate::terraform::{Attribute, AttributeType, ResourceData, Schema};
use crate::validate::{self, Diagnostics};

const DESTINATION_TYPES: &[&str] = &["AzureDiagnostics", "Dedicated"];

const DESTINATIONS: &[&str] = &[
    "eventhub_authorization_rule_id",
    "log_analytics_workspace_id",
    "storage_account_id",
];

/// `azurerm_monitor_diagnostic_setting`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticSettingResource;

fn expand_logs(value: Option<&Value>) -> Vec<LogSettings> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| LogSettings {
                    category: item.get("category").and_then(Value::as_str).map(str::to_string),
                    category_group: item
                        .get("category_group")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    enabled: true,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn expand_metrics(value: Option<&Value>) -> Vec<MetricSettings> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| MetricSettings {
                    category: item.get("category").and_then(Value::as_str).map(str::to_string),
                    time_grain: None,
                    enabled: item.get("enabled").and_then(Value::as_bool).unwrap_or(true),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn flatten_logs(logs: &[LogSettings]) -> Value {
    Value::Array(
        logs.iter()
            .filter(|log| log.enabled)
            .map(|log| match (&log.category, &log.category_group) {
                (_, Some(group)) => json!({ "category_group": group }),
                (Some(category), None) => json!({ "category": category }),
                (None, None) => json!({}),
            })
            .collect(),
    )
}

fn flatten_metrics(metrics: &[MetricSettings]) -> Value {
    Value::Array(
        metrics
            .iter()
            .map(|metric| json!({ "category": metric.category, "enabled": metric.enabled }))
            .collect(),
    )
}

fn expand(data: &ResourceData) -> DiagnosticSettingsResource {
    let string = |key: &str| data.get_str(key).map(str::to_string);
    let logs = expand_logs(data.get("enabled_log"));
    let metrics = expand_metrics(data.get("metric"));

    DiagnosticSettingsResource {
        id: None,
        name: None,
        properties: Some(DiagnosticSettings {
            storage_account_id: string("storage_account_id"),
            workspace_id: string("log_analytics_workspace_id"),
            event_hub_authorization_rule_id: string("eventhub_authorization_rule_id"),
            event_hub_name: string("eventhub_name"),
            log_analytics_destination_type: string("log_analytics_destination_type"),
            logs: (!logs.is_empty()).then_some(logs),
            metrics: (!metrics.is_empty()).then_some(metrics),
        }),
    }
}

#[async_trait]
impl Resource for DiagnosticSettingResource {
    fn type_name(&self) -> &'static str {
        "azurerm_monitor_diagnostic_setting"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("name", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::monitor_diagnostic_setting_name)),
            Attribute::required("target_resource_id", AttributeType::String)
                .force_new()
                .validate(validate::string(validate::string_is_not_empty)),
            Attribute::optional("eventhub_name", AttributeType::String)
                .validate(validate::string(validate::string_is_not_empty)),
            Attribute::optional("eventhub_authorization_rule_id", AttributeType::String),
            Attribute::optional("log_analytics_workspace_id", AttributeType::String),
            Attribute::optional("storage_account_id", AttributeType::String),
            Attribute::optional_computed("log_analytics_destination_type", AttributeType::String)
                .validate(validate::string_in_slice(DESTINATION_TYPES, false)),
            Attribute::optional("enabled_log", AttributeType::List),
            Attribute::optional("metric", AttributeType::List),
        ])
    }

    fn validate(&self, config: &ResourceData) -> Diagnostics {
        let mut diags = self.schema().validate(config);

        if !DESTINATIONS.iter().any(|key| config.get(key).is_some()) {
            diags.error(
                "name",
                format!("at least one of {} must be specified", DESTINATIONS.join(", ")),
            );
        }

        let logs = config.get("enabled_log").and_then(Value::as_array);
        for (i, log) in logs.into_iter().flatten().enumerate() {
            let key = format!("enabled_log.{i}");
            let category = log.get("category").and_then(Value::as_str);
            let group = log.get("category_group").and_then(Value::as_str);
            if category.is_some() == group.is_some() {
                diags.error(
                    &key,
                    "exactly one of category or category_group must be specified",
                );
            }
        }

        let metrics = config.get("metric").and_then(Value::as_array);
        for (i, metric) in metrics.into_iter().flatten().enumerate() {
            if metric.get("category").and_then(Value::as_str).is_none() {
                diags.error(&format!("metric.{i}"), "category must be specified");
            }
        }

        diags
    }

    fn validate_id(&self, id: &str) -> Result<(), ParseError> {
        DiagnosticSettingId::parse(id).map(|_| ())
    }

    async fn create(
        &self,
        clients: &Clients,
        ctx: &Context,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_create(ctx);
        let client = &clients.monitor.diagnostic_settings;
        let id = DiagnosticSettingId::new(
            data.get_str("target_resource_id").unwrap_or_default(),
            data.get_str("name").unwrap_or_default(),
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

        tracing::info!(id = %id, "creating diagnostic setting");
        client
            .create_or_update(&ctx, &id, &expand(data))
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
        let id = DiagnosticSettingId::parse_insensitively(data.id())?;

        let model = match clients.monitor.diagnostic_settings.get(&ctx, &id).await {
            Ok(model) => model,
            Err(e) if e.was_not_found() => {
                tracing::debug!(id = %id, "diagnostic setting was not found - removing from state");
                data.set_id("");
                return Ok(());
            }
            Err(e) => return Err(ResourceError::operation("retrieving", &id)(e)),
        };

        data.set("name", id.diagnostic_setting_name.as_str());
        data.set("target_resource_id", id.scope.as_str());

        let properties = model.properties.unwrap_or_default();
        data.set_opt("storage_account_id", properties.storage_account_id);
        data.set_opt("log_analytics_workspace_id", properties.workspace_id);
        data.set_opt(
            "eventhub_authorization_rule_id",
            properties.event_hub_authorization_rule_id,
        );
        data.set_opt("eventhub_name", properties.event_hub_name);
        data.set_opt(
            "log_analytics_destination_type",
            properties.log_analytics_destination_type,
        );
        data.set(
            "enabled_log",
            flatten_logs(&properties.logs.unwrap_or_default()),
        );
        data.set(
            "metric",
            flatten_metrics(&properties.metrics.unwrap_or_default()),
        );
        Ok(())
    }

    async fn update(
        &self,
        clients: &Clients,
        ctx: &Context,
        _prior: &ResourceData,
        data: &mut ResourceData,
    ) -> Result<(), ResourceError> {
        let ctx = clients.timeouts.for_update(ctx);
        let id = DiagnosticSettingId::parse(data.id())?;

        clients
            .monitor
            .diagnostic_settings
            .create_or_update(&ctx, &id, &expand(data))
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
        let id = DiagnosticSettingId::parse(data.id())?;

        match clients.monitor.diagnostic_settings.delete(&ctx, &id).await {
            Ok(_) => Ok(()),
            Err(e) if e.was_not_found() => Ok(()),
            Err(e) => Err(ResourceError::operation("deleting", &id)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/example/providers/Microsoft.KeyVault/vaults/kv";

    fn config(value: Value) -> ResourceData {
        serde_json::from_value(json!({ "attributes": value })).unwrap()
    }

    #[test]
    fn test_validate_requires_destination() {
        let diags = DiagnosticSettingResource.validate(&config(json!({
            "name": "diag",
            "target_resource_id": VAULT
        })));
        assert!(!diags.is_valid());
        assert!(diags.errors[0].message.contains("at least one of"));
    }

    #[test]
    fn test_validate_log_category_exclusive() {
        let diags = DiagnosticSettingResource.validate(&config(json!({
            "name": "diag",
            "target_resource_id": VAULT,
            "storage_account_id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/sa",
            "enabled_log": [{"category": "AuditEvent", "category_group": "audit"}, {"category_group": "allLogs"}]
        })));
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].key, "enabled_log.0");
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        let diags = DiagnosticSettingResource.validate(&config(json!({
            "name": "diag/1",
            "target_resource_id": VAULT,
            "log_analytics_workspace_id": "/x"
        })));
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].key, "name");
    }

    #[test]
    fn test_expand_and_flatten() {
        let data = config(json!({
            "name": "diag",
            "target_resource_id": VAULT,
            "log_analytics_workspace_id": "/workspace",
            "enabled_log": [{"category_group": "allLogs"}],
            "metric": [{"category": "AllMetrics", "enabled": false}]
        }));
        let model = expand(&data);
        let properties = model.properties.unwrap();
        assert_eq!(properties.workspace_id.as_deref(), Some("/workspace"));
        let logs = properties.logs.unwrap();
        assert_eq!(flatten_logs(&logs), json!([{"category_group": "allLogs"}]));
        let metrics = properties.metrics.unwrap();
        assert_eq!(
            flatten_metrics(&metrics),
            json!([{"category": "AllMetrics", "enabled": false}])
        );
    }

    #[test]
    fn test_validate_id_keeps_scope() {
        let id = format!("{VAULT}/providers/Microsoft.Insights/diagnosticSettings/diag");
        assert!(DiagnosticSettingResource.validate_id(&id).is_ok());
        assert!(DiagnosticSettingResource.validate_id(VAULT).is_err());
    }
}
