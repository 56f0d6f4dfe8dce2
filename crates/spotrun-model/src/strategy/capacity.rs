use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// Capacity offering a cluster can place tasks on.
///
/// - `Fargate`: on-demand capacity, never reclaimed by the provider.
/// - `FargateSpot`: preemptible capacity at reduced cost; tasks may be stopped with short notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityProvider {
    Fargate,
    FargateSpot,
}

impl CapacityProvider {
    /// Provider name as the control plane spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityProvider::Fargate => "FARGATE",
            CapacityProvider::FargateSpot => "FARGATE_SPOT",
        }
    }

    /// `true` for offerings the provider may reclaim.
    pub fn is_preemptible(&self) -> bool {
        matches!(self, CapacityProvider::FargateSpot)
    }
}

impl FromStr for CapacityProvider {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fargate" => Ok(CapacityProvider::Fargate),
            "fargate_spot" | "spot" => Ok(CapacityProvider::FargateSpot),
            _ => Err(ModelError::UnknownCapacityProvider(s.to_string())),
        }
    }
}

impl fmt::Display for CapacityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
