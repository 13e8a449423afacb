arm_enum! {
    pub enum ProvisioningState {
        Accepted => "Accepted",
        Canceled => "Canceled",
        Creating => "Creating",
        Deleting => "Deleting",
        Failed => "Failed",
        Succeeded => "Succeeded",
        Updating => "Updating",
    }
}

impl ProvisioningState {
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Succeeded | Self::Failed | Self::Canceled => true,
            Self::Other(value) => value.eq_ignore_ascii_case("cancelled"),
            _ => false,
        }
    }
}

arm_enum! {
    pub enum PublicNetworkAccess {
        Disabled => "Disabled",
        Enabled => "Enabled",
    }
}

arm_enum! {
    pub enum ConfigurationStoreSku {
        Developer => "developer",
        Free => "free",
        Premium => "premium",
        Standard => "standard",
    }
}

arm_enum! {
    pub enum CreateMode {
        Default => "Default",
        Recover => "Recover",
    }
}

arm_enum! {
    pub enum AuthenticationMode {
        Local => "Local",
        PassThrough => "Pass-through",
    }
}

arm_enum! {
    pub enum PrivateLinkDelegation {
        Disabled => "Disabled",
        Enabled => "Enabled",
    }
}

arm_enum! {
    pub enum ReplicationProtectedItemHealth {
        Critical => "Critical",
        None => "None",
        Normal => "Normal",
        Warning => "Warning",
    }
}

arm_enum! {
    pub enum SetMultiVmSyncStatus {
        Disable => "Disable",
        Enable => "Enable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ProvisioningState::from("succeeded"), ProvisioningState::Succeeded);
        assert_eq!(ProvisioningState::from("SUCCEEDED"), ProvisioningState::Succeeded);
        assert_eq!(
            "pass-through".parse::<AuthenticationMode>().unwrap(),
            AuthenticationMode::PassThrough
        );
    }

    #[test]
    fn test_unknown_values_are_kept() {
        let state = ProvisioningState::from("Migrating");
        assert_eq!(state, ProvisioningState::Other("Migrating".to_string()));
        assert_eq!(state.as_str(), "Migrating");
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProvisioningState::Succeeded.is_terminal());
        assert!(ProvisioningState::Failed.is_terminal());
        assert!(ProvisioningState::Canceled.is_terminal());
        assert!(ProvisioningState::from("Cancelled").is_terminal());
        assert!(!ProvisioningState::Creating.is_terminal());
    }

    #[test]
    fn test_serde_uses_canonical_casing() {
        let sku: ConfigurationStoreSku = serde_json::from_str(r#""Standard""#).unwrap();
        assert_eq!(sku, ConfigurationStoreSku::Standard);
        assert_eq!(serde_json::to_string(&sku).unwrap(), r#""standard""#);
    }

    #[test]
    fn test_possible_values() {
        assert_eq!(PublicNetworkAccess::possible_values(), &["Disabled", "Enabled"]);
        assert_eq!(ConfigurationStoreSku::possible_values().len(), 4);
    }
}
