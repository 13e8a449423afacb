use super::Segment;

crate::resource_id! {
    pub struct SubscriptionId("subscription", "Subscription") {
        subscription_id: "subscriptionId" => "Subscription",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
    ];
}

crate::resource_id! {
    pub struct ResourceGroupId("resource_group", "Resource Group") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
    ];
}

crate::resource_id! {
    pub struct ConfigurationStoreId("configuration_store", "Configuration Store") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        configuration_store_name: "configurationStoreName" => "Configuration Store Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAppConfiguration", "Microsoft.AppConfiguration"),
        Segment::static_segment("staticConfigurationStores", "configurationStores"),
        Segment::user_specified("configurationStoreName"),
    ];
}

crate::resource_id! {
    /// A soft-deleted App Configuration store, addressed by location rather
    /// than resource group.
    pub struct DeletedConfigurationStoreId("deleted_configuration_store", "Deleted Configuration Store") {
        subscription_id: "subscriptionId" => "Subscription",
        location_name: "locationName" => "Location Name",
        deleted_configuration_store_name: "deletedConfigurationStoreName" => "Deleted Configuration Store Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAppConfiguration", "Microsoft.AppConfiguration"),
        Segment::static_segment("staticLocations", "locations"),
        Segment::user_specified("locationName"),
        Segment::static_segment("staticDeletedConfigurationStores", "deletedConfigurationStores"),
        Segment::user_specified("deletedConfigurationStoreName"),
    ];
}

crate::resource_id! {
    pub struct DedicatedHardwareSecurityModuleId("dedicated_hsm", "Dedicated Hardware Security Module") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        dedicated_hsm_name: "dedicatedHSMName" => "Dedicated H S M Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftHardwareSecurityModules", "Microsoft.HardwareSecurityModules"),
        Segment::static_segment("staticDedicatedHSMs", "dedicatedHSMs"),
        Segment::user_specified("dedicatedHSMName"),
    ];
}

crate::resource_id! {
    pub struct ActionRuleId("action_rule", "Action Rule") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        action_rule_name: "actionRuleName" => "Action Rule Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAlertsManagement", "Microsoft.AlertsManagement"),
        Segment::static_segment("staticActionRules", "actionRules"),
        Segment::user_specified("actionRuleName"),
    ];
}

crate::resource_id! {
    /// A diagnostic setting attached to any resource, which becomes the scope.
    pub struct DiagnosticSettingId("diagnostic_setting", "Diagnostic Setting") {
        scope: "scope" => "Scope",
        diagnostic_setting_name: "diagnosticSettingName" => "Diagnostic Setting Name",
    }
    segments = [
        Segment::scope("scope"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftInsights", "Microsoft.Insights"),
        Segment::static_segment("staticDiagnosticSettings", "diagnosticSettings"),
        Segment::user_specified("diagnosticSettingName"),
    ];
}

crate::resource_id! {
    pub struct KeyVaultId("key_vault", "Key Vault") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        vault_name: "vaultName" => "Vault Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftKeyVault", "Microsoft.KeyVault"),
        Segment::static_segment("staticVaults", "vaults"),
        Segment::user_specified("vaultName"),
    ];
}

crate::resource_id! {
    pub struct StorageAccountId("storage_account", "Storage Account") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        storage_account_name: "storageAccountName" => "Storage Account Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftStorage", "Microsoft.Storage"),
        Segment::static_segment("staticStorageAccounts", "storageAccounts"),
        Segment::user_specified("storageAccountName"),
    ];
}

crate::resource_id! {
    pub struct VirtualMachineId("virtual_machine", "Virtual Machine") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        virtual_machine_name: "virtualMachineName" => "Virtual Machine Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftCompute", "Microsoft.Compute"),
        Segment::static_segment("staticVirtualMachines", "virtualMachines"),
        Segment::user_specified("virtualMachineName"),
    ];
}

crate::resource_id! {
    pub struct SubnetId("subnet", "Subnet") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        virtual_network_name: "virtualNetworkName" => "Virtual Network Name",
        subnet_name: "subnetName" => "Subnet Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftNetwork", "Microsoft.Network"),
        Segment::static_segment("staticVirtualNetworks", "virtualNetworks"),
        Segment::user_specified("virtualNetworkName"),
        Segment::static_segment("staticSubnets", "subnets"),
        Segment::user_specified("subnetName"),
    ];
}

crate::resource_id! {
    pub struct ReplicationProtectedItemId("replication_protected_item", "Replication Protected Item") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        vault_name: "vaultName" => "Vault Name",
        replication_fabric_name: "replicationFabricName" => "Replication Fabric Name",
        replication_protection_container_name: "replicationProtectionContainerName" => "Replication Protection Container Name",
        replication_protected_item_name: "replicationProtectedItemName" => "Replication Protected Item Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftRecoveryServices", "Microsoft.RecoveryServices"),
        Segment::static_segment("staticVaults", "vaults"),
        Segment::user_specified("vaultName"),
        Segment::static_segment("staticReplicationFabrics", "replicationFabrics"),
        Segment::user_specified("replicationFabricName"),
        Segment::static_segment("staticReplicationProtectionContainers", "replicationProtectionContainers"),
        Segment::user_specified("replicationProtectionContainerName"),
        Segment::static_segment("staticReplicationProtectedItems", "replicationProtectedItems"),
        Segment::user_specified("replicationProtectedItemName"),
    ];
}

impl ResourceGroupId {
    pub fn subscription(&self) -> SubscriptionId {
        SubscriptionId::new(self.subscription_id.clone())
    }
}

impl ConfigurationStoreId {
    pub fn resource_group(&self) -> ResourceGroupId {
        ResourceGroupId::new(self.subscription_id.clone(), self.resource_group_name.clone())
    }
}
