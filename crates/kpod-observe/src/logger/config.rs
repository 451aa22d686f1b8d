use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::{LoggerError, LoggerFormat, LoggerLevel};

/// Environment variable that overrides [`LoggerConfig::level`].
pub const LOG_ENV: &str = "KPOD_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    /// Print the event target (module path) in text and json output.
    pub with_targets: bool,
    /// Colour text output. Ignored when stdout is not a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    /// Replace the level with the value of [`LOG_ENV`], when set and non-empty.
    pub fn with_env_override(self) -> Result<Self, LoggerError> {
        match std::env::var(LOG_ENV) {
            Ok(v) if !v.trim().is_empty() => Ok(self.with_level(v.parse()?)),
            _ => Ok(self),
        }
    }

    pub(crate) fn ansi(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.level.as_str(), "info");
        assert!(cfg.with_targets);
        assert!(cfg.use_color);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: LoggerConfig =
            serde_json::from_str(r#"{"format":"json","withTargets":false}"#).unwrap();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert!(!cfg.with_targets);
        assert_eq!(cfg.level, LoggerLevel::default());
    }

    #[test]
    fn invalid_level_fails_deserialization() {
        let res = serde_json::from_str::<LoggerConfig>(r#"{"level":"kpod_core=shout"}"#);
        assert!(res.is_err());
    }
}
