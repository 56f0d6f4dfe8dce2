use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    domain::constants::ECS_TASKS_PRINCIPAL,
    error::{ModelError, ModelResult},
};

/// Service identity allowed to assume a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServicePrincipal(String);

impl ServicePrincipal {
    /// The container task runtime.
    pub fn ecs_tasks() -> Self {
        Self(ECS_TASKS_PRINCIPAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-managed policy, referenced by its well-known name.
///
/// Existence is resolved by the provisioning engine, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagedPolicy(String);

impl ManagedPolicy {
    pub fn aws_managed(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// ARN the name resolves to.
    pub fn arn(&self) -> String {
        format!("arn:aws:iam::aws:policy/{}", self.0)
    }
}

/// Execution identity assumed by the task runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    pub assumed_by: ServicePrincipal,
    /// Attached policies, in attachment order. An empty list is legal but leaves
    /// the task without registry or telemetry access.
    #[serde(default)]
    pub managed_policies: Vec<ManagedPolicy>,
}

impl RoleSpec {
    pub fn validate(&self) -> ModelResult<()> {
        if self.assumed_by.0 != ECS_TASKS_PRINCIPAL {
            return Err(ModelError::UntrustedPrincipal {
                expected: ECS_TASKS_PRINCIPAL,
                got: self.assumed_by.0.clone(),
            });
        }
        Ok(())
    }
}
