use thiserror::Error;

/// Structural invalidity of a descriptor or of a reference between descriptors.
///
/// Every variant is raised at graph-construction time, before anything is handed
/// to a provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid logical id: {0:?}")]
    InvalidId(String),

    #[error("duplicate logical id: {0}")]
    DuplicateId(String),

    #[error("availability zone count must be within 1..={max}, got {got}")]
    AvailabilityZones { got: u32, max: u32 },

    #[error("capacity provider set must not be empty")]
    EmptyCapacityProviders,

    #[error("unknown capacity provider: {0}")]
    UnknownCapacityProvider(String),

    #[error("invalid task size: cpu={cpu} memory={memory_mib}MiB is not a supported combination")]
    InvalidTaskSize { cpu: u32, memory_mib: u32 },

    #[error("task definition {task} must declare exactly one container, got {count}")]
    ContainerCount { task: String, count: usize },

    #[error("invalid container: {0}")]
    InvalidContainer(String),

    #[error("duplicate environment key: {0}")]
    DuplicateEnvKey(String),

    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("invalid port {port} for protocol {protocol}")]
    InvalidPort { protocol: String, port: u16 },

    #[error("invalid source range: {0:?}")]
    InvalidCidr(String),

    #[error("capacity provider strategy must not be empty")]
    EmptyStrategy,

    #[error("capacity provider weight must be positive: {provider}")]
    NonPositiveWeight { provider: String },

    #[error("capacity provider {provider} is not enabled on cluster {cluster}")]
    ProviderNotEnabled { provider: String, cluster: String },

    #[error("service {existing} is already placed; only one service per deployment")]
    DuplicateService { existing: String },

    #[error("{from} references unknown resource {to}")]
    UnresolvedReference { from: String, to: String },

    #[error("{from} references {to} as {expected}, but it is a {actual}")]
    ReferenceKind {
        from: String,
        to: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("role may only be assumed by {expected}, got {got:?}")]
    UntrustedPrincipal { expected: &'static str, got: String },

    #[error("dependency cycle through {0}")]
    Cycle(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
