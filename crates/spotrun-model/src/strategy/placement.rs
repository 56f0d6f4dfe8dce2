use serde::{Deserialize, Serialize};

use super::CapacityProvider;
use crate::error::{ModelError, ModelResult};

/// One entry of a capacity-provider strategy.
///
/// `weight` is relative: a provider receives `weight / sum(weights)` of the replicas
/// placed beyond the `base` minimums. `base` replicas always land on this provider first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityProviderStrategy {
    pub capacity_provider: CapacityProvider,
    pub weight: u32,
    #[serde(default)]
    pub base: u32,
}

impl CapacityProviderStrategy {
    /// Strategy entry with no base reservation.
    pub fn new(capacity_provider: CapacityProvider, weight: u32) -> ModelResult<Self> {
        let entry = Self {
            capacity_provider,
            weight,
            base: 0,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.weight == 0 {
            return Err(ModelError::NonPositiveWeight {
                provider: self.capacity_provider.to_string(),
            });
        }
        Ok(())
    }
}

/// Validate a whole strategy list: non-empty, every weight positive.
pub fn validate_strategy(strategy: &[CapacityProviderStrategy]) -> ModelResult<()> {
    if strategy.is_empty() {
        return Err(ModelError::EmptyStrategy);
    }
    strategy.iter().try_for_each(CapacityProviderStrategy::validate)
}

/// Proportional share of `provider` across a strategy, in `0.0..=1.0`.
///
/// Returns `None` when the provider does not appear or the aggregate weight is zero.
pub fn weight_share(
    strategy: &[CapacityProviderStrategy],
    provider: CapacityProvider,
) -> Option<f64> {
    let total: u64 = strategy.iter().map(|s| u64::from(s.weight)).sum();
    let mine: u64 = strategy
        .iter()
        .filter(|s| s.capacity_provider == provider)
        .map(|s| u64::from(s.weight))
        .sum();

    if total == 0 || !strategy.iter().any(|s| s.capacity_provider == provider) {
        return None;
    }
    Some(mine as f64 / total as f64)
}
