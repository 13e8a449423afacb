use std::collections::BTreeMap;

use serde_json::Value;

use super::ResourceData;
use crate::models::normalize_location;
use crate::validate::{self, Diagnostics, ValueValidator};

/// Maps a configured value onto the form stored in state.
pub type StateFunc = fn(&Value) -> Value;

/// Returns true when the difference between the prior and the configured
/// value should be ignored.
pub type DiffSuppressFunc = fn(old: &Value, new: &Value) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    /// A map of strings, e.g. tags.
    Map,
    List,
}

impl AttributeType {
    fn matches(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int => value.is_i64(),
            AttributeType::Map => value
                .as_object()
                .is_some_and(|object| object.values().all(Value::is_string)),
            AttributeType::List => value.is_array(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            AttributeType::String => "a string",
            AttributeType::Bool => "a bool",
            AttributeType::Int => "an integer",
            AttributeType::Map => "a map of strings",
            AttributeType::List => "a list",
        }
    }
}

#[derive(Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub type_: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub default: Option<Value>,
    pub validate: Option<ValueValidator>,
    pub state_func: Option<StateFunc>,
    pub diff_suppress: Option<DiffSuppressFunc>,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type_", &self.type_)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("force_new", &self.force_new)
            .field("default", &self.default)
            .field("validate", &self.validate.is_some())
            .field("state_func", &self.state_func.is_some())
            .field("diff_suppress", &self.diff_suppress.is_some())
            .finish()
    }
}

impl Attribute {
    fn new(name: &'static str, type_: AttributeType) -> Self {
        Self {
            name,
            type_,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            default: None,
            validate: None,
            state_func: None,
            diff_suppress: None,
        }
    }

    pub fn required(name: &'static str, type_: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(name, type_)
        }
    }

    pub fn optional(name: &'static str, type_: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(name, type_)
        }
    }

    /// Set by the provider only.
    pub fn computed(name: &'static str, type_: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(name, type_)
        }
    }

    /// Optional, filled in from the API when not configured.
    pub fn optional_computed(name: &'static str, type_: AttributeType) -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::new(name, type_)
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate(mut self, validator: ValueValidator) -> Self {
        self.validate = Some(validator);
        self
    }

    pub fn state_func(mut self, state_func: StateFunc) -> Self {
        self.state_func = Some(state_func);
        self
    }

    pub fn diff_suppress(mut self, diff_suppress: DiffSuppressFunc) -> Self {
        self.diff_suppress = Some(diff_suppress);
        self
    }

    fn is_configurable(&self) -> bool {
        self.required || self.optional
    }

    fn normalized(&self, value: &Value) -> Value {
        match self.state_func {
            Some(state_func) => state_func(value),
            None => value.clone(),
        }
    }
}

/// The required, force-new `location` argument. Display names such as
/// `West Europe` are stored as `westeurope`.
pub fn location() -> Attribute {
    Attribute::required("location", AttributeType::String)
        .force_new()
        .validate(validate::string(validate::string_is_not_empty))
        .state_func(|value| match value.as_str() {
            Some(location) => Value::from(normalize_location(location)),
            None => value.clone(),
        })
}

/// The attributes a resource accepts and reports.
#[derive(Debug, Clone)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes: attributes.into_iter().map(|a| (a.name, a)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Checks configuration locally: unknown keys, required and computed
    /// attributes, types and per-attribute validators.
    pub fn validate(&self, data: &ResourceData) -> Diagnostics {
        let mut diags = Diagnostics::default();

        for key in data.attributes.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                diags.error(key, format!("an argument named {key:?} is not expected here"));
            }
        }

        for attribute in self.attributes.values() {
            let name = attribute.name;
            let Some(value) = data.get(name) else {
                if attribute.required {
                    diags.error(name, format!("the argument {name:?} is required, but no definition was found"));
                }
                continue;
            };

            if !attribute.is_configurable() {
                diags.error(name, format!("{name:?} is computed and cannot be set"));
                continue;
            }

            if !attribute.type_.matches(value) {
                diags.error(
                    name,
                    format!("expected {name} to be {}", attribute.type_.describe()),
                );
                continue;
            }

            if let Some(validator) = &attribute.validate {
                diags.extend(validator(value, name));
            }
        }

        diags
    }

    /// Drops computed-only attributes, which only the provider sets.
    pub fn strip_computed(&self, data: &mut ResourceData) {
        data.attributes.retain(|key, _| {
            self.attributes
                .get(key.as_str())
                .is_none_or(Attribute::is_configurable)
        });
    }

    pub fn apply_defaults(&self, data: &mut ResourceData) {
        for attribute in self.attributes.values() {
            if let Some(default) = &attribute.default {
                if data.get(attribute.name).is_none() {
                    data.set(attribute.name, default.clone());
                }
            }
        }
    }

    /// Rewrites configured values into their stored form.
    pub fn normalize(&self, data: &mut ResourceData) {
        for attribute in self.attributes.values() {
            if let Some(value) = data.get(attribute.name) {
                let normalized = attribute.normalized(value);
                data.set(attribute.name, normalized);
            }
        }
    }

    /// Like [`ResourceData::has_change`], but compares normalized values
    /// and honours the attribute's diff suppression.
    pub fn has_change(&self, prior: &ResourceData, config: &ResourceData, name: &str) -> bool {
        let Some(attribute) = self.attributes.get(name) else {
            return prior.has_change(config, name);
        };
        let (Some(old), Some(new)) = (prior.get(name), config.get(name)) else {
            return prior.has_change(config, name);
        };

        let old = attribute.normalized(old);
        let new = attribute.normalized(new);
        if old == new {
            return false;
        }
        !attribute.diff_suppress.is_some_and(|suppress| suppress(&old, &new))
    }

    /// Configured `force_new` attributes whose value differs between the
    /// prior state and the new configuration.
    pub fn force_new_changes(&self, prior: &ResourceData, config: &ResourceData) -> Vec<&'static str> {
        self.attributes
            .values()
            .filter(|a| a.force_new && a.is_configurable())
            .filter(|a| config.get(a.name).is_some() && self.has_change(prior, config, a.name))
            .map(|a| a.name)
            .collect()
    }
}
