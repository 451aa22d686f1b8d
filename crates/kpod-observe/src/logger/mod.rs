mod config;
mod error;
mod format;
mod install;
mod level;
mod timer;

pub use config::{LOG_ENV, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timer::UtcRfc3339;

/// Install the global tracing subscriber described by `cfg`.
///
/// Can be called once per process; a second call fails with
/// [`LoggerError::AlreadyInitialized`].
///
/// ```no_run
/// use kpod_observe::{LoggerConfig, init_logger};
///
/// let cfg = LoggerConfig::default().with_env_override().expect("valid KPOD_LOG");
/// init_logger(&cfg).expect("logger");
/// tracing::info!("ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::text(cfg),
        LoggerFormat::Json => install::json(cfg),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
