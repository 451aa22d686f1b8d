use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Control endpoint used when none is configured.
pub const DEFAULT_SOCKET: &str = "unix:/run/podman/io.podman";

/// Delay absorbing backend propagation lag, in milliseconds.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

pub const DEFAULT_HEALTH_ATTEMPTS: u32 = 4;
pub const DEFAULT_HEALTH_DELAY_MS: u64 = 100;

/// Bounded post-start health polling.
///
/// At most `attempts` inspections, `delay_ms` apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheckConfig {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl HealthCheckConfig {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay_ms: delay.as_millis() as u64,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_HEALTH_ATTEMPTS,
            delay_ms: DEFAULT_HEALTH_DELAY_MS,
        }
    }
}

/// Reconciler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconcilerConfig {
    /// Address of the runtime control endpoint, handed to the [`crate::Connector`].
    pub socket: String,
    /// Pause after each create step and after a delete. Zero disables it.
    pub settle_delay_ms: u64,
    pub health: HealthCheckConfig,
}

impl ReconcilerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = socket.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_health(mut self, health: HealthCheckConfig) -> Self {
        self.health = health;
        self
    }

    /// Reject configurations the reconciler cannot run with.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.socket.trim().is_empty() {
            return Err(ReconcileError::Validation("socket address is empty".into()));
        }
        if self.health.attempts == 0 {
            return Err(ReconcileError::Validation(
                "health.attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            socket: DEFAULT_SOCKET.to_string(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            health: HealthCheckConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = ReconcilerConfig::default();

        assert_eq!(cfg.socket, "unix:/run/podman/io.podman");
        assert_eq!(cfg.settle_delay(), Duration::from_millis(100));
        assert_eq!(cfg.health.attempts, 4);
        assert_eq!(cfg.health.delay(), Duration::from_millis(100));
        cfg.validate().expect("defaults must be valid");
    }

    #[test]
    fn partial_deserialization_keeps_defaults() {
        let json = r#"{"settleDelayMs": 0, "health": {"attempts": 10}}"#;
        let cfg: ReconcilerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cfg.socket, DEFAULT_SOCKET);
        assert_eq!(cfg.settle_delay_ms, 0);
        assert_eq!(cfg.health.attempts, 10);
        assert_eq!(cfg.health.delay_ms, DEFAULT_HEALTH_DELAY_MS);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let cfg = ReconcilerConfig::default()
            .with_health(HealthCheckConfig::new(0, Duration::from_millis(5)));
        assert!(matches!(cfg.validate(), Err(ReconcileError::Validation(_))));
    }

    #[test]
    fn empty_socket_is_rejected() {
        let cfg = ReconcilerConfig::default().with_socket("  ");
        assert!(cfg.validate().is_err());
    }
}
