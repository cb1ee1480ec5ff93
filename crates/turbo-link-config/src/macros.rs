//! Configuration definition macros for reducing boilerplate.

/// Macro for defining configuration structs with automatic trait implementations.
///
/// This macro generates:
/// - The struct definition with Serialize, Deserialize, Debug, Clone
/// - Default implementation using provided default values
/// - From<T> for config::Value implementation so the struct can seed layered defaults
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$struct_meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field_name:ident: $field_type:ty = $default_value:expr,
            )*
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }

        impl From<$name> for config::Value {
            fn from(val: $name) -> Self {
                use config::{ValueKind, Map};

                Self::new(
                    None,
                    ValueKind::Table(Map::from_iter(vec![
                        $(
                            (stringify!($field_name).to_string(), val.$field_name.into()),
                        )*
                    ])),
                )
            }
        }
    };
}

/// Macro for defining configuration enums with automatic trait implementations.
///
/// Variants serialize, display and parse as their lowercase names, so
/// `TransferMode::Binary` is written `binary` in TOML and environment overrides.
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$enum_meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident,
            )*
        }
        default = $default_variant:ident
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default_variant
            }
        }

        impl From<$name> for config::Value {
            fn from(val: $name) -> Self {
                use config::{Value, ValueKind};
                Value::new(None, ValueKind::String(val.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        $name::$variant => write!(f, "{}", stringify!($variant).to_lowercase()),
                    )*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok(Self::$variant);
                    }
                )*
                Err(format!("Invalid {} variant: {}", stringify!($name), s))
            }
        }
    };
}

/// Helper macro for creating nested config accessors.
///
/// This macro generates getter and mutable getter methods for nested configuration structs.
#[macro_export]
macro_rules! config_accessors {
    ($struct_name:ident, $($field_name:ident: $field_type:ty),*) => {
        impl $struct_name {
            $(
                paste::paste! {
                    /// Gets a reference to the configuration section.
                    pub fn $field_name(&self) -> &$field_type {
                        &self.$field_name
                    }

                    /// Gets a mutable reference to the configuration section.
                    pub fn [<$field_name _mut>](&mut self) -> &mut $field_type {
                        &mut self.$field_name
                    }
                }
            )*
        }
    };
}
