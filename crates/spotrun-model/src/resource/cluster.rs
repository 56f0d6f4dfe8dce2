use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    domain::ResourceId,
    error::{ModelError, ModelResult},
    strategy::CapacityProvider,
};

/// Logical grouping of compute capacity bound to a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Network the cluster's tasks are placed in.
    pub network: ResourceId,
    /// Capacity offerings enabled on this cluster. Must not be empty.
    pub capacity_providers: BTreeSet<CapacityProvider>,
}

impl ClusterSpec {
    pub fn validate(&self) -> ModelResult<()> {
        if self.capacity_providers.is_empty() {
            return Err(ModelError::EmptyCapacityProviders);
        }
        Ok(())
    }

    /// Returns `true` if tasks may be placed on `provider` in this cluster.
    pub fn enables(&self, provider: CapacityProvider) -> bool {
        self.capacity_providers.contains(&provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc() -> ResourceId {
        ResourceId::new("Vpc").unwrap()
    }

    #[test]
    fn empty_provider_set_is_rejected() {
        let spec = ClusterSpec {
            network: vpc(),
            capacity_providers: BTreeSet::new(),
        };
        assert_eq!(spec.validate(), Err(ModelError::EmptyCapacityProviders));
    }

    #[test]
    fn enables_reports_membership() {
        let spec = ClusterSpec {
            network: vpc(),
            capacity_providers: BTreeSet::from([CapacityProvider::FargateSpot]),
        };
        assert!(spec.validate().is_ok());
        assert!(spec.enables(CapacityProvider::FargateSpot));
        assert!(!spec.enables(CapacityProvider::Fargate));
    }
}
