mod capacity;
pub use capacity::CapacityProvider;

mod placement;
pub use placement::{CapacityProviderStrategy, validate_strategy, weight_share};
