use std::sync::LazyLock;

use regex::Regex;

use super::Diagnostics;

static ALPHANUMERIC_AND_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]*$").unwrap());

static ACTION_RULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$").unwrap());

static RESOURCE_GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w._()]+$").unwrap());

static STORAGE_ACCOUNT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{3,24}$").unwrap());

const DIAGNOSTIC_SETTING_FORBIDDEN: &[char] = &['<', '>', '*', '%', '&', ':', '\\', '?', '+', '/'];

// Shared by vault-style names: 3-24 letters, digits and single dashes,
// starting with a letter and ending with a letter or digit.
fn vault_style_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    let len = value.chars().count();

    if !(3..=24).contains(&len) {
        diags.error(key, format!("{key} must be between 3 and 24 characters in length"));
    }
    if !ALPHANUMERIC_AND_DASHES.is_match(value) {
        diags.error(
            key,
            format!("{key} may only contain alphanumeric characters and dashes"),
        );
    }
    if !value.starts_with(|c: char| c.is_ascii_alphabetic()) {
        diags.error(key, format!("{key} must start with a letter"));
    }
    if !value.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        diags.error(key, format!("{key} must end with a letter or digit"));
    }
    if value.contains("--") {
        diags.error(key, format!("{key} must not contain consecutive hyphens"));
    }
    diags
}

pub fn dedicated_hardware_security_module_name(value: &str, key: &str) -> Diagnostics {
    vault_style_name(value, key)
}

pub fn key_vault_name(value: &str, key: &str) -> Diagnostics {
    vault_style_name(value, key)
}

pub fn monitor_diagnostic_setting_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    let len = value.chars().count();

    if !(1..=260).contains(&len) {
        diags.error(key, format!("{key} must be between 1 and 260 characters in length"));
    }
    if value.contains(DIAGNOSTIC_SETTING_FORBIDDEN) {
        diags.error(
            key,
            format!("{key} cannot contain the characters < > * % & : \\ ? + /"),
        );
    }
    diags
}

pub fn action_rule_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    if !ACTION_RULE_NAME.is_match(value) {
        diags.error(
            key,
            format!(
                "{key} must start with a letter or digit and may only contain letters, digits, underscores and dashes"
            ),
        );
    }
    diags
}

pub fn resource_group_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    let len = value.chars().count();

    if !(1..=90).contains(&len) {
        diags.error(key, format!("{key} must be between 1 and 90 characters in length"));
    }
    if value.ends_with('.') {
        diags.error(key, format!("{key} cannot end with a period"));
    }
    if !value.is_empty() && !RESOURCE_GROUP_NAME.is_match(value) {
        diags.error(
            key,
            format!(
                "{key} may only contain alphanumeric characters, dash, underscores, parentheses and periods"
            ),
        );
    }
    diags
}

pub fn configuration_store_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    let len = value.chars().count();

    if !(5..=50).contains(&len) {
        diags.error(key, format!("{key} must be between 5 and 50 characters in length"));
    }
    if !ALPHANUMERIC_AND_DASHES.is_match(value) {
        diags.error(
            key,
            format!("{key} may only contain alphanumeric characters and dashes"),
        );
    }
    diags
}

pub fn storage_account_name(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    if !STORAGE_ACCOUNT_NAME.is_match(value) {
        diags.error(
            key,
            format!(
                "{key} can only consist of lowercase letters and numbers, and must be between 3 and 24 characters long"
            ),
        );
    }
    diags
}

/// Every name validator, keyed the way the command line refers to them.
pub const NAME_VALIDATORS: &[(&str, super::StringValidateFunc)] = &[
    ("dedicated_hsm_name", dedicated_hardware_security_module_name),
    ("key_vault_name", key_vault_name),
    ("monitor_diagnostic_setting_name", monitor_diagnostic_setting_name),
    ("action_rule_name", action_rule_name),
    ("resource_group_name", resource_group_name),
    ("configuration_store_name", configuration_store_name),
    ("storage_account_name", storage_account_name),
];

pub fn lookup_name_validator(name: &str) -> Option<super::StringValidateFunc> {
    NAME_VALIDATORS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, f)| *f)
}
