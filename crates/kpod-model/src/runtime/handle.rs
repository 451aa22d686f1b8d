use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Address of a pod inside the runtime, derived from a workload spec.
    ///
    /// Always recomputed from the spec; never cached.
    RuntimeKey
);

string_id!(
    /// Identifier the runtime returns from pod creation.
    ///
    /// Only meaningful within the create call that produced it.
    PodHandle
);

string_id!(
    /// Identifier the runtime returns from container creation.
    ContainerHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_and_serializes_as_plain_string() {
        let key = RuntimeKey::new("test-pod");
        assert_eq!(key.to_string(), "test-pod");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""test-pod""#);

        let handle: PodHandle = serde_json::from_str(r#""4f1c""#).unwrap();
        assert_eq!(handle.as_str(), "4f1c");
    }
}
