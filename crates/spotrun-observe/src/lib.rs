//! Logging setup shared by the spotrun binaries.
mod clock;
mod config;
mod error;
mod format;
mod install;
mod level;

pub use clock::{LogClock, LoggerTimeZone};
pub use config::{ENV_LOG, ENV_LOG_FORMAT, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;

/// Install the global tracing subscriber described by `cfg`.
///
/// With [`LoggerTimeZone::Local`], call this before starting any threads: the local
/// offset is resolved here, once, and falls back to UTC if it cannot be detected.
///
/// Returns [`LoggerError::AlreadyInitialized`] on a second call.
///
/// ```no_run
/// use spotrun_observe::{LoggerConfig, init_logger};
///
/// let cfg = LoggerConfig::from_env().unwrap_or_default();
/// init_logger(&cfg).expect("logger");
/// tracing::info!("ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let clock = LogClock::resolve(cfg.tz);
    match cfg.format {
        LoggerFormat::Text => install::text(cfg, clock),
        LoggerFormat::Json => install::json(cfg, clock),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
