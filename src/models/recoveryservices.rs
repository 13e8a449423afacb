//! Site Recovery replication policies, whose provider-specific settings are
//! polymorphic on `instanceType`.

use serde::{Deserialize, Serialize};

use super::SetMultiVmSyncStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2APolicyCreationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    pub multi_vm_sync_status: SetMultiVmSyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaAzurePolicyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_consistent_snapshot_frequency_in_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_accounts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMageRcmPolicyCreationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_multi_vm_sync: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_in_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VMwareCbtPolicyCreationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_in_minutes: Option<i64>,
}

discriminated_union! {
    /// Provider-specific settings sent when creating a replication policy.
    pub enum PolicyProviderSpecificInput {
        A2A(A2APolicyCreationInput) => "A2A",
        HyperVReplicaAzure(HyperVReplicaAzurePolicyInput) => "HyperVReplicaAzure",
        InMageRcm(InMageRcmPolicyCreationInput) => "InMageRcm",
        VMwareCbt(VMwareCbtPolicyCreationInput) => "VMwareCbt",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2APolicyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_vm_sync_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_threshold_in_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaAzurePolicyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_consistent_snapshot_frequency_in_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_duration_in_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_storage_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMageRcmPolicyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_multi_vm_sync: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_in_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmwareCbtPolicyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_consistent_frequency_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_point_history_in_minutes: Option<i64>,
}

discriminated_union! {
    /// Provider-specific settings reported for an existing replication policy.
    pub enum PolicyProviderSpecificDetails {
        A2A(A2APolicyDetails) => "A2A",
        HyperVReplicaAzure(HyperVReplicaAzurePolicyDetails) => "HyperVReplicaAzure",
        InMageRcm(InMageRcmPolicyDetails) => "InMageRcm",
        VMwareCbt(VmwareCbtPolicyDetails) => "VMwareCbt",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ReplicationPolicyProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationPolicyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_specific_details: Option<PolicyProviderSpecificDetails>,
}
