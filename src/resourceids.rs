//! Azure resource IDs.
//!
//! A single data-driven parser handles every ID type: each type is described
//! by an ordered list of [`Segment`]s and the [`resource_id!`] macro stamps out
//! the typed struct, its constructor and its [`ResourceId`] implementation.

mod ids;
mod parser;
mod segment;

pub use ids::*;
pub use parser::{ParsedResourceId, Parser, format_segments};
pub use segment::{Segment, SegmentKind};

use thiserror::Error;

use crate::validate::{Diagnostics, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("segment {segment:?} not found in id {id:?}")]
    SegmentNotFound { segment: &'static str, id: String },

    #[error("unexpected segment {segment:?} in id {id:?}")]
    UnexpectedSegment { segment: String, id: String },
}

impl ParseError {
    pub fn id(&self) -> &str {
        match self {
            ParseError::SegmentNotFound { id, .. } | ParseError::UnexpectedSegment { id, .. } => id,
        }
    }
}

/// Describes one kind of resource ID.
#[derive(Debug, Clone, Copy)]
pub struct ResourceIdType {
    /// Short key used on the command line, e.g. `key_vault`.
    pub key: &'static str,
    /// Human readable name, e.g. `Key Vault`.
    pub name: &'static str,
    pub segments: &'static [Segment],
}

impl ResourceIdType {
    pub fn parse(&self, input: &str, insensitive: bool) -> Result<ParsedResourceId, ParseError> {
        if insensitive {
            Parser::insensitive(self.segments).parse(input)
        } else {
            Parser::new(self.segments).parse(input)
        }
    }

    /// The path with every user-specified segment shown as `{name}`.
    pub fn template(&self) -> String {
        let mut out = String::new();
        for segment in self.segments {
            match segment.fixed_value() {
                Some(literal) => {
                    out.push('/');
                    out.push_str(literal);
                }
                None if segment.kind == SegmentKind::Scope => {
                    out.push_str(&format!("{{{}}}", segment.name))
                }
                None => out.push_str(&format!("/{{{}}}", segment.name)),
            }
        }
        out
    }

    /// The canonical path for previously parsed values.
    pub fn format(&self, parsed: &ParsedResourceId) -> String {
        format_segments(self.segments, |name| parsed.get(name))
    }

    pub fn example_id(&self) -> String {
        let examples: Vec<(&'static str, String)> = self
            .segments
            .iter()
            .map(|s| (s.name, s.example_value()))
            .collect();
        format_segments(self.segments, |name| {
            examples
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        })
    }
}

pub trait ResourceId: Sized + Clone + std::fmt::Debug + std::fmt::Display + Send + Sync {
    const TYPE: ResourceIdType;

    fn from_parsed(parsed: &ParsedResourceId, input: &str) -> Result<Self, ParseError>;

    fn segment_value(&self, segment: &str) -> Option<&str>;

    fn parse(input: &str) -> Result<Self, ParseError> {
        let parsed = Parser::new(Self::TYPE.segments).parse(input)?;
        Self::from_parsed(&parsed, input)
    }

    /// Parses an ID returned by the API, whose static segments may be cased
    /// differently from the canonical form.
    fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        let parsed = Parser::insensitive(Self::TYPE.segments).parse(input)?;
        Self::from_parsed(&parsed, input)
    }

    fn segments() -> &'static [Segment] {
        Self::TYPE.segments
    }

    /// The canonical string form of this ID.
    fn id(&self) -> String {
        format_segments(Self::TYPE.segments, |name| self.segment_value(name))
    }
}

/// Schema validator checking that a value parses as `T`.
pub fn validate_resource_id<T: ResourceId>(value: &str, key: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    if let Err(err) = T::parse(value) {
        diags.errors.push(ValidationError::new(key, err.to_string()));
    }
    diags
}

/// Declares a typed resource ID.
///
/// Each field maps to the user-specified segment of the same name; the
/// segment list gives the full path including static segments.
#[macro_export]
macro_rules! resource_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($key:literal, $display:literal) {
            $($field:ident: $segment:literal => $label:literal),+ $(,)?
        }
        segments = [$($seg:expr),+ $(,)?];
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            $(pub $field: String,)+
        }

        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: impl Into<String>),+) -> Self {
                Self {
                    $($field: $field.into(),)+
                }
            }
        }

        impl $crate::resourceids::ResourceId for $name {
            const TYPE: $crate::resourceids::ResourceIdType = $crate::resourceids::ResourceIdType {
                key: $key,
                name: $display,
                segments: &[$($seg),+],
            };

            fn from_parsed(
                parsed: &$crate::resourceids::ParsedResourceId,
                input: &str,
            ) -> Result<Self, $crate::resourceids::ParseError> {
                Ok(Self {
                    $($field: parsed
                        .get($segment)
                        .ok_or_else(|| $crate::resourceids::ParseError::SegmentNotFound {
                            segment: $segment,
                            id: input.to_string(),
                        })?
                        .to_string(),)+
                })
            }

            fn segment_value(&self, segment: &str) -> Option<&str> {
                match segment {
                    $($segment => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let components = [$(format!("{}: {:?}", $label, self.$field)),+];
                write!(f, "{} ({})", $display, components.join(" / "))
            }
        }
    };
}

/// Every ID type the command line knows how to parse.
pub const KNOWN_TYPES: &[ResourceIdType] = &[
    <SubscriptionId as ResourceId>::TYPE,
    <ResourceGroupId as ResourceId>::TYPE,
    <ConfigurationStoreId as ResourceId>::TYPE,
    <DeletedConfigurationStoreId as ResourceId>::TYPE,
    <DedicatedHardwareSecurityModuleId as ResourceId>::TYPE,
    <ActionRuleId as ResourceId>::TYPE,
    <DiagnosticSettingId as ResourceId>::TYPE,
    <KeyVaultId as ResourceId>::TYPE,
    <StorageAccountId as ResourceId>::TYPE,
    <VirtualMachineId as ResourceId>::TYPE,
    <SubnetId as ResourceId>::TYPE,
    <ReplicationProtectedItemId as ResourceId>::TYPE,
];

pub fn lookup_type(key: &str) -> Option<&'static ResourceIdType> {
    KNOWN_TYPES.iter().find(|t| t.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::SegmentNotFound {
            segment: "resourceGroupName",
            id: "/subscriptions/abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "segment \"resourceGroupName\" not found in id \"/subscriptions/abc\""
        );
        assert_eq!(err.id(), "/subscriptions/abc");
    }

    #[test]
    fn test_lookup_type() {
        let vault = lookup_type("key_vault").unwrap();
        assert_eq!(vault.name, "Key Vault");
        assert!(lookup_type("nonexistent").is_none());
    }

    #[test]
    fn test_known_type_keys_are_unique() {
        let mut keys: Vec<&str> = KNOWN_TYPES.iter().map(|t| t.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), KNOWN_TYPES.len());
    }

    #[test]
    fn test_template() {
        assert_eq!(
            ResourceGroupId::TYPE.template(),
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}"
        );
        assert_eq!(
            DiagnosticSettingId::TYPE.template(),
            "{scope}/providers/Microsoft.Insights/diagnosticSettings/{diagnosticSettingName}"
        );
    }

    #[test]
    fn test_every_example_id_parses() {
        for id_type in KNOWN_TYPES {
            let example = id_type.example_id();
            assert!(
                id_type.parse(&example, false).is_ok(),
                "example for {} did not parse: {}",
                id_type.key,
                example
            );
        }
    }

    #[test]
    fn test_validate_resource_id() {
        let ok = validate_resource_id::<ResourceGroupId>(
            "/subscriptions/sub/resourceGroups/rg",
            "resource_group_id",
        );
        assert!(ok.is_valid());

        let bad = validate_resource_id::<ResourceGroupId>("/subscriptions/sub", "resource_group_id");
        assert_eq!(bad.errors.len(), 1);
        assert_eq!(bad.errors[0].key, "resource_group_id");
        assert!(bad.errors[0].message.contains("resourceGroupName"));
    }
}
