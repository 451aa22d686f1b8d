use serde::{Deserialize, Serialize};

use crate::{Env, ModelError, ModelResult};

/// One container of a workload pod, in the caller's schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    /// Container name, unique within its pod.
    pub name: String,
    /// Image reference (e.g. `busybox`, `docker.io/library/redis:7`).
    pub image: String,
    /// Entrypoint override. Empty means the image default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Arguments passed to the entrypoint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub env: Env,
}

impl ContainerSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(name, value);
        self
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        let invalid = |reason: &str| ModelError::InvalidContainer {
            container: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(invalid("name contains whitespace or '/'"));
        }
        if self.image.trim().is_empty() {
            return Err(invalid("image is empty"));
        }
        Ok(())
    }
}
