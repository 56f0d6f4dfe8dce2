use thiserror::Error;

use spotrun_model::ModelError;

use crate::engine::ProvisioningError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The graph is structurally invalid; nothing was submitted.
    #[error("configuration error: {0}")]
    Configuration(#[from] ModelError),

    /// The provisioning engine rejected or failed the apply. Reported verbatim.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

impl CoreError {
    /// `true` if the failure happened before anything reached the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CoreError::Configuration(_))
    }
}
