use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Env, Labels};

/// Lifecycle state of a container as reported by the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Configured,
    Created,
    Running,
    Stopped,
    Paused,
    Exited,
    /// Anything the runtime reports that is not one of the above.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ContainerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Configured => "configured",
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Stopped => "stopped",
            ContainerState::Paused => "paused",
            ContainerState::Exited => "exited",
            ContainerState::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a single container inside an inspected pod.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInspect {
    pub id: String,
    /// Runtime-wide container name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Env,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub state: ContainerState,
    /// Infra (pause) container owned by the runtime, not by the workload.
    #[serde(default)]
    pub infra: bool,
}

/// Transient status snapshot returned by `InspectPod`.
///
/// Fetched fresh for every read and every health probe; never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodInspect {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub containers: Vec<ContainerInspect>,
}

impl PodInspect {
    /// Containers that belong to the workload (infra containers excluded), in runtime order.
    pub fn app_containers(&self) -> impl Iterator<Item = &ContainerInspect> {
        self.containers.iter().filter(|c| !c.infra)
    }

    /// `true` when there is at least one workload container and all of them are running.
    pub fn all_running(&self) -> bool {
        let mut any = false;
        for c in self.app_containers() {
            if !c.state.is_running() {
                return false;
            }
            any = true;
        }
        any
    }
}

/// Entry returned by `ListPods`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(name: &str, state: ContainerState, infra: bool) -> ContainerInspect {
        ContainerInspect {
            id: format!("id-{name}"),
            name: name.to_string(),
            state,
            infra,
            ..Default::default()
        }
    }

    #[test]
    fn unknown_state_deserializes_to_unknown() {
        let s: ContainerState = serde_json::from_str(r#""removing""#).unwrap();
        assert_eq!(s, ContainerState::Unknown);
        let s: ContainerState = serde_json::from_str(r#""running""#).unwrap();
        assert!(s.is_running());
    }

    #[test]
    fn all_running_ignores_infra_containers() {
        let pod = PodInspect {
            id: "p".into(),
            name: "pod".into(),
            containers: vec![
                container("infra", ContainerState::Created, true),
                container("app", ContainerState::Running, false),
            ],
            ..Default::default()
        };
        assert!(pod.all_running());
        assert_eq!(pod.app_containers().count(), 1);
    }

    #[test]
    fn all_running_is_false_without_app_containers() {
        let pod = PodInspect {
            id: "p".into(),
            containers: vec![container("infra", ContainerState::Running, true)],
            ..Default::default()
        };
        assert!(!pod.all_running());
    }

    #[test]
    fn all_running_is_false_when_any_container_lags() {
        let pod = PodInspect {
            id: "p".into(),
            containers: vec![
                container("a", ContainerState::Running, false),
                container("b", ContainerState::Created, false),
            ],
            ..Default::default()
        };
        assert!(!pod.all_running());
    }
}
