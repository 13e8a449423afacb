//! Request and response payloads.
//!
//! String enums follow the ARM convention: known values parse
//! case-insensitively and anything else is kept verbatim in `Other`.

/// Declares a string enum with a best-effort `Other` fallback.
macro_rules! arm_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn possible_values() -> &'static [&'static str] {
                &[$($value),+]
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<&str> for $name {
            fn from(input: &str) -> Self {
                $(
                    if input.eq_ignore_ascii_case($value) {
                        return Self::$variant;
                    }
                )+
                Self::Other(input.to_string())
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(input))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(value.as_str()))
            }
        }
    };
}

/// Declares a payload selected by its `instanceType` field.
///
/// Decoding reads the discriminator first and then decodes the matching
/// variant; unknown discriminators are kept as raw JSON.
macro_rules! discriminated_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($ty:ty) => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $($variant($ty),)+
            Raw {
                instance_type: String,
                values: serde_json::Map<String, serde_json::Value>,
            },
        }

        impl $name {
            pub fn instance_type(&self) -> &str {
                match self {
                    $(Self::$variant(_) => $tag,)+
                    Self::Raw { instance_type, .. } => instance_type,
                }
            }

            pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
                use serde::de::Error as _;

                let object = match value {
                    serde_json::Value::Object(object) => object,
                    other => {
                        return Err(serde_json::Error::custom(format!(
                            "expected an object for {}, got {}",
                            stringify!($name),
                            other
                        )));
                    }
                };
                let instance_type = object
                    .get($crate::models::DISCRIMINATOR)
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| {
                        serde_json::Error::custom(format!(
                            "missing {:?} in {}",
                            $crate::models::DISCRIMINATOR,
                            stringify!($name)
                        ))
                    })?
                    .to_string();

                $(
                    if instance_type.eq_ignore_ascii_case($tag) {
                        return serde_json::from_value(serde_json::Value::Object(object))
                            .map(Self::$variant);
                    }
                )+

                Ok(Self::Raw {
                    instance_type,
                    values: object,
                })
            }

            pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
                let mut value = match self {
                    $(Self::$variant(inner) => serde_json::to_value(inner)?,)+
                    Self::Raw { values, .. } => serde_json::Value::Object(values.clone()),
                };
                if let serde_json::Value::Object(object) = &mut value {
                    object.insert(
                        $crate::models::DISCRIMINATOR.to_string(),
                        serde_json::Value::String(self.instance_type().to_string()),
                    );
                }
                Ok(value)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use serde::ser::Error as _;
                let value = self.to_value().map_err(S::Error::custom)?;
                serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                use serde::de::Error as _;
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_value(value).map_err(D::Error::custom)
            }
        }
    };
}

mod appconfiguration;
mod enums;
mod monitor;
mod recoveryservices;
mod resources;

pub use appconfiguration::*;
pub use enums::*;
pub use monitor::*;
pub use recoveryservices::*;
pub use resources::*;

/// The field selecting the concrete shape of a polymorphic payload.
pub const DISCRIMINATOR: &str = "instanceType";

/// Lower-cases a location and strips spaces, so `West Europe` and
/// `westeurope` compare equal.
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location("West Europe"), "westeurope");
        assert_eq!(normalize_location("westeurope"), "westeurope");
        assert_eq!(normalize_location(" UK South "), "uksouth");
    }
}
