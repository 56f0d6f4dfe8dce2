//! Explicit deployment configuration.
//!
//! All external inputs are collected here once, so graph construction never reads
//! process state. Missing inputs become empty strings, never errors.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Stack name used when none is configured.
pub const DEFAULT_STACK_NAME: &str = "FargateSpotRunnerStack";

pub const VAR_GITHUB_PERSONAL_TOKEN: &str = "GITHUB_PERSONAL_TOKEN";
pub const VAR_GITHUB_REPOSITORY_URL: &str = "GITHUB_REPOSITORY_URL";
pub const VAR_GITHUB_USERNAME: &str = "GITHUB_USERNAME";
pub const VAR_GITHUB_REPOSITORY_NAME: &str = "GITHUB_REPOSITORY_NAME";
pub const VAR_STACK_NAME: &str = "SPOTRUN_STACK_NAME";

/// Opaque credential. Redacted in `Debug` output; serialized as-is because the
/// runner container has to receive it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_empty() { "" } else { "***" })
    }
}

/// Upstream CI service inputs for the runner container.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GithubConfig {
    pub personal_token: Secret,
    pub repository_url: String,
    pub username: String,
    pub repository_name: String,
}

/// Everything graph construction consumes from the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackConfig {
    pub stack_name: String,
    pub github: GithubConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            github: GithubConfig::default(),
        }
    }
}

impl StackConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset GitHub inputs resolve to `""`. An unset or empty stack name falls back to
    /// [`DEFAULT_STACK_NAME`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let cfg = Self {
            stack_name: lookup(VAR_STACK_NAME)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STACK_NAME.to_string()),
            github: GithubConfig {
                personal_token: Secret::new(var(VAR_GITHUB_PERSONAL_TOKEN)),
                repository_url: var(VAR_GITHUB_REPOSITORY_URL),
                username: var(VAR_GITHUB_USERNAME),
                repository_name: var(VAR_GITHUB_REPOSITORY_NAME),
            },
        };
        cfg.warn_on_gaps();
        cfg
    }

    /// Names of GitHub inputs that resolved to the empty string.
    pub fn missing_inputs(&self) -> Vec<&'static str> {
        let gh = &self.github;
        [
            (VAR_GITHUB_PERSONAL_TOKEN, gh.personal_token.is_empty()),
            (VAR_GITHUB_REPOSITORY_URL, gh.repository_url.is_empty()),
            (VAR_GITHUB_USERNAME, gh.username.is_empty()),
            (VAR_GITHUB_REPOSITORY_NAME, gh.repository_name.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    fn warn_on_gaps(&self) {
        let missing = self.missing_inputs();
        if missing.is_empty() {
            return;
        }
        // Not an error: the runner registers with whatever it gets.
        warn!(missing = ?missing, "configuration inputs unset, substituting empty strings");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_inputs() {
        let cfg = StackConfig::from_lookup(lookup_from(&[
            (VAR_GITHUB_PERSONAL_TOKEN, "ghp_abc"),
            (VAR_GITHUB_REPOSITORY_URL, "https://github.com/acme/app"),
            (VAR_GITHUB_USERNAME, "acme"),
            (VAR_GITHUB_REPOSITORY_NAME, "app"),
            (VAR_STACK_NAME, "CiRunners"),
        ]));

        assert_eq!(cfg.stack_name, "CiRunners");
        assert_eq!(cfg.github.personal_token.expose(), "ghp_abc");
        assert_eq!(cfg.github.repository_url, "https://github.com/acme/app");
        assert_eq!(cfg.github.username, "acme");
        assert_eq!(cfg.github.repository_name, "app");
        assert!(cfg.missing_inputs().is_empty());
    }

    #[test]
    fn missing_inputs_become_empty_strings() {
        let cfg = StackConfig::from_lookup(|_| None);

        assert_eq!(cfg.stack_name, DEFAULT_STACK_NAME);
        assert!(cfg.github.personal_token.is_empty());
        assert_eq!(cfg.github.repository_url, "");
        assert_eq!(cfg.missing_inputs().len(), 4);
    }

    #[test]
    fn blank_stack_name_falls_back_to_default() {
        let cfg = StackConfig::from_lookup(lookup_from(&[(VAR_STACK_NAME, "  ")]));
        assert_eq!(cfg.stack_name, DEFAULT_STACK_NAME);
    }

    #[test]
    fn debug_output_redacts_token() {
        let cfg = StackConfig::from_lookup(lookup_from(&[(VAR_GITHUB_PERSONAL_TOKEN, "ghp_abc")]));
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("ghp_abc"));
        assert!(dbg.contains("Secret(***)"));
        assert_eq!(cfg.github.personal_token.to_string(), "***");
    }

    #[test]
    fn serde_defaults_missing_fields() {
        let cfg: StackConfig = serde_json::from_str(r#"{"github":{"username":"acme"}}"#).unwrap();
        assert_eq!(cfg.stack_name, DEFAULT_STACK_NAME);
        assert_eq!(cfg.github.username, "acme");
        assert!(cfg.github.personal_token.is_empty());
    }
}
