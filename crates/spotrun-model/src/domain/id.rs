use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Longest logical id accepted by the provider.
const MAX_ID_LEN: usize = 255;

/// Stable logical name of a resource within one stack (e.g. `"Vpc"`).
///
/// Dependents refer to their dependencies by this id, never by copy.
/// A valid id starts with an ASCII letter and contains only ASCII
/// alphanumerics, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Validate and wrap a logical id.
    pub fn new(id: impl Into<String>) -> ModelResult<Self> {
        Self::try_from(id.into())
    }

    /// Returns the id as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if starts_with_letter && rest_ok && s.len() <= MAX_ID_LEN {
            Ok(ResourceId(s))
        } else {
            Err(ModelError::InvalidId(s))
        }
    }
}

impl FromStr for ResourceId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
