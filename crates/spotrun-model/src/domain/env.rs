use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Single container environment variable.
///
/// Serialized as `{"name": .., "value": ..}`, the shape container definitions use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    name: String,
    value: String,
}

impl EnvVar {
    pub fn new<K, V>(name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<(&str, &str)> for EnvVar {
    fn from((name, value): (&str, &str)) -> Self {
        Self::new(name, value)
    }
}

/// Environment of a container: unique keys, declaration order preserved.
///
/// Setting an existing key replaces its value in place, so a key never appears twice.
/// Deserialization rejects duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EnvVar>")]
#[serde(into = "Vec<EnvVar>")]
pub struct Env(Vec<EnvVar>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.0.iter()
    }

    /// Iterate over variable names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(EnvVar::name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|v| v.name == name).map(EnvVar::value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|v| v.name == name)
    }

    /// Set a variable, replacing the value of an existing key in place.
    pub fn set<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let var = EnvVar::new(name, value);
        match self.0.iter_mut().find(|v| v.name == var.name) {
            Some(slot) => slot.value = var.value,
            None => self.0.push(var),
        }
        self
    }

    /// Builder-style [`Env::set`].
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set(name, value);
        self
    }
}

impl TryFrom<Vec<EnvVar>> for Env {
    type Error = ModelError;
    fn try_from(vars: Vec<EnvVar>) -> ModelResult<Self> {
        let mut env = Env::new();
        for var in vars {
            if env.contains_key(var.name()) {
                return Err(ModelError::DuplicateEnvKey(var.name));
            }
            env.0.push(var);
        }
        Ok(env)
    }
}

impl From<Env> for Vec<EnvVar> {
    fn from(env: Env) -> Self {
        env.0
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Env::new();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}
