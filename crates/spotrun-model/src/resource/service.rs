use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReplicaCount, ResourceId},
    error::ModelResult,
    strategy::{CapacityProviderStrategy, validate_strategy},
};

/// Binds a task definition to a cluster with a replica count and placement strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub cluster: ResourceId,
    pub task_definition: ResourceId,
    /// Access policies attached to the service's tasks.
    #[serde(default)]
    pub security_groups: Vec<ResourceId>,
    /// Steady-state number of running tasks.
    pub desired_count: ReplicaCount,
    /// Weighted placement across capacity providers. Must not be empty.
    pub capacity_provider_strategies: Vec<CapacityProviderStrategy>,
}

impl ServiceSpec {
    pub fn validate(&self) -> ModelResult<()> {
        validate_strategy(&self.capacity_provider_strategies)
    }
}
