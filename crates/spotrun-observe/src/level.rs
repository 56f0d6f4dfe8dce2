use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LoggerError;

const DEFAULT_LEVEL: &str = "info";

/// Validated `EnvFilter` directive string, e.g. `"info"` or `"spotrun_core=debug,warn"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter. Falls back to `info` if the directive no longer parses.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self(DEFAULT_LEVEL.to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LoggerError::InvalidLevel("empty filter".into()));
        }
        EnvFilter::try_new(trimmed)
            .map(|_| LoggerLevel(trimmed.to_string()))
            .map_err(|e| LoggerError::InvalidLevel(format!("{trimmed}: {e}")))
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels_and_directives() {
        for lvl in ["info", "warn", "trace", "spotrun_core=debug,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "{lvl} should parse");
        }
    }

    #[test]
    fn rejects_bad_directives() {
        for lvl in ["", "   ", "spotrun_core=loud", "a=trace,b=wat"] {
            assert!(lvl.parse::<LoggerLevel>().is_err(), "{lvl:?} should fail");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let lvl = LoggerLevel::new("  debug ").unwrap();
        assert_eq!(lvl.as_str(), "debug");
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let lvl: LoggerLevel = serde_json::from_str(r#""warn""#).unwrap();
        assert_eq!(lvl.as_str(), "warn");
        assert!(serde_json::from_str::<LoggerLevel>(r#""x=nope""#).is_err());
        assert_eq!(serde_json::to_string(&lvl).unwrap(), r#""warn""#);
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LoggerLevel::default().as_str(), "info");
        let _ = LoggerLevel::default().to_env_filter();
    }
}
