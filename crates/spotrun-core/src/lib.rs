pub mod config;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod graph;
pub mod profile;

pub mod prelude {
    pub use crate::config::{GithubConfig, Secret, StackConfig};
    pub use crate::deploy::DeployApi;
    pub use crate::engine::{
        ApplyReport, ApplyRequest, DryRunEngine, ProvisioningEngine, ProvisioningError,
    };
    pub use crate::error::CoreError;
    pub use crate::graph::{GraphBuilder, ResourceGraph};
    pub use crate::profile::{runner_stack, runner_stack_with};
}
