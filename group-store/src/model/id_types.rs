//! Identity types for groups and devices

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate common ID type implementations
macro_rules! impl_id_type {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::new(s)
            }
        }
    };
}

/// Unique identifier for a device group
///
/// Assigned by the store when a group is created (a UUIDv4 string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// Generate a fresh random group id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl_id_type!(GroupId);

/// Identifier of an audio endpoint, as reported by the OS
///
/// Opaque to this crate; compared only for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(String);

impl_id_type!(DeviceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(GroupId::generate(), GroupId::generate());
    }

    #[test]
    fn test_display() {
        let id = DeviceId::new("{0.0.0.00000000}.{abc}");
        assert_eq!(format!("{}", id), "{0.0.0.00000000}.{abc}");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = GroupId::new("grp-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"grp-1\"");
    }
}
