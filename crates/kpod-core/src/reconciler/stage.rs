use std::fmt;

/// Progress of a single create call.
///
/// `Validated → PodCreated → ContainersCreated → Started → Healthy`.
/// When create fails, the stage reached tells what was left behind in the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    /// Spec accepted; nothing sent to the runtime.
    Validated,
    /// Pod shell exists; `containers` of its containers were created so far.
    PodCreated { containers: usize },
    /// All containers exist; pod not started.
    ContainersCreated,
    /// Pod started; health not yet confirmed.
    Started,
    /// All containers observed running.
    Healthy,
}

impl CreateStage {
    /// `true` if the runtime holds state from this create call.
    pub fn left_runtime_state(&self) -> bool {
        !matches!(self, CreateStage::Validated)
    }
}

impl fmt::Display for CreateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateStage::Validated => f.write_str("validated"),
            CreateStage::PodCreated { containers } => {
                write!(f, "pod-created(containers={containers})")
            }
            CreateStage::ContainersCreated => f.write_str("containers-created"),
            CreateStage::Started => f.write_str("started"),
            CreateStage::Healthy => f.write_str("healthy"),
        }
    }
}
