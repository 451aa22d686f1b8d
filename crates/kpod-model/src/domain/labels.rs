use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::RESERVED_LABEL_PREFIX;

/// Key–value metadata attached to pods and containers.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or overwrite a label. Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// First key under [`RESERVED_LABEL_PREFIX`], if any.
    pub fn reserved_key(&self) -> Option<&str> {
        self.0
            .keys()
            .find(|k| k.starts_with(RESERVED_LABEL_PREFIX))
            .map(|k| k.as_str())
    }

    /// Copy of `self` without keys under [`RESERVED_LABEL_PREFIX`].
    pub fn without_reserved(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, _)| !k.starts_with(RESERVED_LABEL_PREFIX))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Labels;
    use crate::{LABEL_CONTAINER_NAME, LABEL_MANAGED_BY, RESERVED_LABEL_PREFIX};

    #[test]
    fn without_reserved_drops_kpod_keys() {
        let mut labels = Labels::new();
        labels
            .insert("app", "web")
            .insert(LABEL_MANAGED_BY, "kpod")
            .insert(LABEL_CONTAINER_NAME, "c1");

        let user = labels.without_reserved();
        assert_eq!(user.get("app"), Some("web"));
        assert!(user.get(LABEL_MANAGED_BY).is_none());
        assert_eq!(user.0.len(), 1);
    }

    #[test]
    fn any_key_under_reserved_prefix_is_reserved() {
        let mut labels = Labels::new();
        labels.insert("kpod.io-team", "a").insert("app", "web");
        assert_eq!(labels.reserved_key(), None);

        labels.insert(format!("{RESERVED_LABEL_PREFIX}owner"), "x");
        assert_eq!(labels.reserved_key(), Some("kpod.io/owner"));
        assert_eq!(labels.without_reserved().0.len(), 2);
    }
}
