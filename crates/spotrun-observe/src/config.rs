use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{
    clock::LoggerTimeZone,
    error::LoggerResult,
    format::LoggerFormat,
    level::LoggerLevel,
};

/// Environment variable holding the filter directive.
pub const ENV_LOG: &str = "SPOTRUN_LOG";
/// Environment variable holding the output format.
pub const ENV_LOG_FORMAT: &str = "SPOTRUN_LOG_FORMAT";

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter directive, e.g. `"info"` or `"spotrun_core=debug,info"`.
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Include targets (module paths) in text and json output.
    pub with_targets: bool,
    /// Color text output. Only honored when stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by [`ENV_LOG`] and [`ENV_LOG_FORMAT`].
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` yields. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut cfg = Self::default();
        if let Some(level) = var(ENV_LOG) {
            cfg.level = level.parse()?;
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            cfg.format = format.parse()?;
        }
        Ok(cfg)
    }

    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn should_use_color(&self) -> bool {
        self.use_color && self.format == LoggerFormat::Text && std::io::stdout().is_terminal()
    }
}
