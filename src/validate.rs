//! Schema validators.
//!
//! Validators take the value and the attribute key it was read from and
//! return [`Diagnostics`]: zero errors means the value is acceptable. They
//! never touch the network and never panic, whatever the input.

mod names;

pub use names::*;

use std::sync::Arc;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<ValidationError>,
}

impl Diagnostics {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, key: &str, message: impl Into<String>) {
        self.errors.push(ValidationError::new(key, message));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }
}

/// Validates a string attribute.
pub type StringValidateFunc = fn(&str, &str) -> Diagnostics;

/// Validates an attribute of any type, as stored in configuration.
pub type ValueValidator = Arc<dyn Fn(&Value, &str) -> Diagnostics + Send + Sync>;

/// Lifts a string validator so it can be attached to a schema attribute.
pub fn string(f: StringValidateFunc) -> ValueValidator {
    Arc::new(move |value: &Value, key: &str| match value.as_str() {
        Some(s) => f(s, key),
        None => {
            let mut diags = Diagnostics::default();
            diags.error(key, format!("expected {key} to be a string"));
            diags
        }
    })
}

pub fn string_is_not_empty(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    if value.trim().is_empty() {
        diags.error(key, format!("{key} must not be empty"));
    }
    diags
}

pub fn string_in_slice(valid: &'static [&'static str], ignore_case: bool) -> ValueValidator {
    Arc::new(move |value: &Value, key: &str| {
        let mut diags = Diagnostics::default();
        let Some(s) = value.as_str() else {
            diags.error(key, format!("expected {key} to be a string"));
            return diags;
        };
        let found = valid.iter().any(|v| {
            if ignore_case {
                v.eq_ignore_ascii_case(s)
            } else {
                *v == s
            }
        });
        if !found {
            diags.error(
                key,
                format!("expected {key} to be one of [{}], got {s}", valid.join(", ")),
            );
        }
        diags
    })
}

pub fn int_between(min: i64, max: i64) -> ValueValidator {
    Arc::new(move |value: &Value, key: &str| {
        let mut diags = Diagnostics::default();
        match value.as_i64() {
            Some(v) if (min..=max).contains(&v) => {}
            Some(v) => diags.error(
                key,
                format!("expected {key} to be in the range ({min} - {max}), got {v}"),
            ),
            None => diags.error(key, format!("expected {key} to be an integer")),
        }
        diags
    })
}

pub fn is_uuid(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    if uuid::Uuid::try_parse(value).is_err() {
        diags.error(key, format!("expected {key} to be a valid UUID, got {value}"));
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("12345678-1234-9876-4563-123456789012", "subscription_id").is_valid());
        assert!(!is_uuid("not-a-uuid", "subscription_id").is_valid());
        assert!(!is_uuid("", "subscription_id").is_valid());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("name", "must not be empty");
        assert_eq!(err.to_string(), "name: must not be empty");
    }

    #[test]
    fn test_string_adapter_rejects_non_strings() {
        let validator = string(string_is_not_empty);
        assert!(validator(&json!("value"), "name").is_valid());
        let diags = validator(&json!(42), "name");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].message, "expected name to be a string");
    }

    #[test]
    fn test_string_is_not_empty() {
        assert!(!string_is_not_empty("", "name").is_valid());
        assert!(!string_is_not_empty("   ", "name").is_valid());
        assert!(string_is_not_empty("x", "name").is_valid());
    }

    #[test]
    fn test_string_in_slice() {
        let strict = string_in_slice(&["Free", "Standard"], false);
        assert!(strict(&json!("Free"), "sku").is_valid());
        assert!(!strict(&json!("free"), "sku").is_valid());

        let relaxed = string_in_slice(&["Free", "Standard"], true);
        assert!(relaxed(&json!("free"), "sku").is_valid());
        assert!(!relaxed(&json!("premium"), "sku").is_valid());
    }

    #[test]
    fn test_int_between() {
        let validator = int_between(1, 7);
        assert!(validator(&json!(1), "days").is_valid());
        assert!(validator(&json!(7), "days").is_valid());
        assert!(!validator(&json!(0), "days").is_valid());
        assert!(!validator(&json!(8), "days").is_valid());
        assert!(!validator(&json!("3"), "days").is_valid());
    }

    #[test]
    fn test_diagnostics_extend() {
        let mut first = Diagnostics::default();
        first.error("a", "bad");
        let mut second = Diagnostics::default();
        second.warnings.push("careful".to_string());
        second.error("b", "worse");
        first.extend(second);
        assert_eq!(first.errors.len(), 2);
        assert_eq!(first.warnings, vec!["careful".to_string()]);
        assert!(!first.is_valid());
    }
}
