//! Seam between the validated resource graph and whatever creates real infrastructure.
//!
//! The graph is handed to an engine as an [`ApplyRequest`]; creation, update and rollback
//! are the engine's business.
mod error;
pub use error::ProvisioningError;

mod dry_run;
pub use dry_run::DryRunEngine;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spotrun_model::ResourceId;

use crate::graph::ResourceGraph;

/// One submission of a resource graph to an engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub request_id: Uuid,
    pub stack_name: String,
    /// Dependencies-first order the engine should follow.
    pub order: Vec<ResourceId>,
    pub graph: ResourceGraph,
}

impl ApplyRequest {
    pub fn new(stack_name: impl Into<String>, graph: ResourceGraph) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            stack_name: stack_name.into(),
            order: graph.apply_order().to_vec(),
            graph,
        }
    }
}

/// What an engine reports after a successful apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub request_id: Uuid,
    pub engine: String,
    /// Resources the engine created or confirmed, in the order it handled them.
    pub applied: Vec<ResourceId>,
}

/// Provisioning backend.
///
/// An engine is responsible for:
/// - creating every resource of the request in dependency order;
/// - reporting its own failures as [`ProvisioningError`].
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Engine name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Apply the whole graph.
    async fn apply(&self, request: &ApplyRequest) -> Result<ApplyReport, ProvisioningError>;
}
