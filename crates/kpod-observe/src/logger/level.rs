use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `EnvFilter` directive string, e.g. `info` or `kpod_core=debug,warn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(filter: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(filter.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter. The directive was checked on construction; should the check
    /// ever disagree, everything at `info` and above is let through.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;

    fn try_from(filter: String) -> Result<Self, Self::Error> {
        let filter = filter.trim().to_string();
        if filter.is_empty() {
            return Err(LoggerError::InvalidLevel {
                filter,
                reason: "empty".into(),
            });
        }
        match EnvFilter::try_new(&filter) {
            Ok(_) => Ok(Self(filter)),
            Err(e) => Err(LoggerError::InvalidLevel {
                filter,
                reason: e.to_string(),
            }),
        }
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_per_target_directives() {
        for ok in ["info", "trace", "kpod_core=debug,warn", "kpod_core::reconciler=trace"] {
            assert!(ok.parse::<LoggerLevel>().is_ok(), "{ok} should parse");
        }
    }

    #[test]
    fn rejects_bad_directives() {
        for bad in ["", "   ", "kpod_core=loud", "a=trace,b=nope"] {
            assert!(
                matches!(bad.parse::<LoggerLevel>(), Err(LoggerError::InvalidLevel { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LoggerLevel::default().as_str(), "info");
        let _ = LoggerLevel::default().to_env_filter();
    }

    #[test]
    fn deserialization_validates() {
        let lvl: LoggerLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(lvl.as_str(), "debug");
        assert!(serde_json::from_str::<LoggerLevel>(r#""x=bogus""#).is_err());
    }
}
