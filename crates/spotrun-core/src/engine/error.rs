use thiserror::Error;

/// Failure reported by a provisioning engine.
///
/// Engines own their error text; callers surface it unchanged.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("engine '{engine}' rejected resource {resource}: {message}")]
    Rejected {
        engine: &'static str,
        resource: String,
        message: String,
    },

    #[error("engine '{engine}' failed: {message}")]
    Failed {
        engine: &'static str,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}
