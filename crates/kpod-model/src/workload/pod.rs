use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ContainerSpec, Labels, ModelError, ModelResult};

/// Declarative description of a pod and its containers.
///
/// The pod is identified by `name` alone; there is no namespace dimension.
/// Container order is significant: containers are created in this order and
/// come back in runtime order when a pod is read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadPodSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

impl WorkloadPodSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a container. Builder-style.
    ///
    /// ```rust
    /// use kpod_model::{ContainerSpec, WorkloadPodSpec};
    ///
    /// let spec = WorkloadPodSpec::new("web")
    ///     .with_container(ContainerSpec::new("nginx", "nginx:1.27"));
    /// assert_eq!(spec.containers.len(), 1);
    /// ```
    pub fn with_container(mut self, container: ContainerSpec) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Check the spec before anything is sent to the runtime.
    ///
    /// Rules:
    /// - `name` is non-empty and contains no whitespace or `/`;
    /// - at least one container;
    /// - every container has a non-empty name and image;
    /// - container names are unique.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidPod("name is empty".into()));
        }
        if self.name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ModelError::InvalidPod(format!(
                "name '{}' contains whitespace or '/'",
                self.name
            )));
        }
        if self.containers.is_empty() {
            return Err(ModelError::InvalidPod(format!(
                "pod '{}' has no containers",
                self.name
            )));
        }

        let mut seen = HashSet::with_capacity(self.containers.len());
        for c in &self.containers {
            c.validate()?;
            if !seen.insert(c.name.as_str()) {
                return Err(ModelError::InvalidContainer {
                    container: c.name.clone(),
                    reason: "duplicate container name".into(),
                });
            }
        }
        Ok(())
    }
}
