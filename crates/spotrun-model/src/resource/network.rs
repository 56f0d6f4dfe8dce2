use serde::{Deserialize, Serialize};

use crate::{
    domain::constants::MAX_AVAILABILITY_ZONES,
    error::{ModelError, ModelResult},
};

/// Isolated virtual network spanning a bounded number of availability zones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Availability zones the network spans, `1..=MAX_AVAILABILITY_ZONES`.
    pub max_azs: u32,
}

impl NetworkSpec {
    pub fn new(max_azs: u32) -> ModelResult<Self> {
        let spec = Self { max_azs };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if (1..=MAX_AVAILABILITY_ZONES).contains(&self.max_azs) {
            Ok(())
        } else {
            Err(ModelError::AvailabilityZones {
                got: self.max_azs,
                max: MAX_AVAILABILITY_ZONES,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_enforced() {
        assert!(NetworkSpec::new(1).is_ok());
        assert!(NetworkSpec::new(MAX_AVAILABILITY_ZONES).is_ok());
        assert_eq!(
            NetworkSpec::new(0),
            Err(ModelError::AvailabilityZones { got: 0, max: 6 })
        );
        assert!(NetworkSpec::new(MAX_AVAILABILITY_ZONES + 1).is_err());
    }
}
