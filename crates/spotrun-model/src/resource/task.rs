use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Env, ResourceId, TaskSize},
    error::{ModelError, ModelResult},
};

/// Container image reference (e.g. `"myoung34/github-runner:latest"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Image pulled by name from a public registry.
    pub fn from_registry(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.0.is_empty() || self.0.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidContainer(format!(
                "invalid image reference {:?}",
                self.0
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named log sink the container's stdout/stderr is shipped to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSink {
    /// Prefix of every log stream the container writes.
    pub stream_prefix: String,
}

impl LogSink {
    pub fn new(stream_prefix: impl Into<String>) -> Self {
        Self {
            stream_prefix: stream_prefix.into(),
        }
    }
}

/// One container of a task definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image: ImageRef,
    /// Keys are fixed at construction time; values are always strings.
    #[serde(default)]
    pub environment: Env,
    pub logging: LogSink,
}

impl ContainerSpec {
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidContainer(
                "container name must not be empty".into(),
            ));
        }
        self.image.validate()?;
        if self.logging.stream_prefix.trim().is_empty() {
            return Err(ModelError::InvalidContainer(format!(
                "container {} has an empty log stream prefix",
                self.name
            )));
        }
        Ok(())
    }
}

/// Schedulable unit of work: sizing, identity and containers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionSpec {
    #[serde(flatten)]
    pub size: TaskSize,
    /// Role the task runs as.
    pub task_role: ResourceId,
    /// Exactly one container once the definition is complete.
    pub containers: Vec<ContainerSpec>,
}

impl TaskDefinitionSpec {
    /// Validate sizing and containers. `id` is used for error reporting only.
    pub fn validate(&self, id: &ResourceId) -> ModelResult<()> {
        self.size.validate()?;
        if self.containers.len() != 1 {
            return Err(ModelError::ContainerCount {
                task: id.to_string(),
                count: self.containers.len(),
            });
        }
        self.containers.iter().try_for_each(ContainerSpec::validate)
    }

    /// The single container of a complete definition.
    pub fn container(&self) -> Option<&ContainerSpec> {
        self.containers.first()
    }
}
