use serde::{Deserialize, Serialize};

use crate::{Env, Labels, PodHandle};

/// Creation payload for an empty pod shell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Whether the runtime should create an infra (pause) container holding the namespaces.
    #[serde(default)]
    pub infra: bool,
}

/// Creation payload for one container bound to an existing pod.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTemplate {
    /// Pod the container joins.
    pub pod: PodHandle,
    /// Runtime-wide container name.
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}
