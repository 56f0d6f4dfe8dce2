//! High-level deploy API over a [`ProvisioningEngine`].
//! - Owns the engine handle and the stack name.
//! - Wraps a validated graph into an [`ApplyRequest`] and submits it.
//! - Passes engine failures through unchanged.
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    engine::{ApplyReport, ApplyRequest, ProvisioningEngine},
    error::CoreError,
    graph::ResourceGraph,
};

/// Thin wrapper that submits resource graphs to one engine under one stack name.
pub struct DeployApi {
    engine: Arc<dyn ProvisioningEngine>,
    stack_name: String,
}

impl DeployApi {
    pub fn new(engine: Arc<dyn ProvisioningEngine>, stack_name: impl Into<String>) -> Self {
        Self {
            engine,
            stack_name: stack_name.into(),
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    /// Get a clone of the underlying engine handle.
    pub fn engine(&self) -> Arc<dyn ProvisioningEngine> {
        Arc::clone(&self.engine)
    }

    /// Build the request that [`DeployApi::deploy`] would submit.
    pub fn request(&self, graph: &ResourceGraph) -> ApplyRequest {
        ApplyRequest::new(self.stack_name.clone(), graph.clone())
    }

    /// Submit `graph` to the engine.
    #[instrument(level = "debug", skip(self, graph), fields(stack = %self.stack_name, engine = self.engine.name()))]
    pub async fn deploy(&self, graph: &ResourceGraph) -> Result<ApplyReport, CoreError> {
        let request = self.request(graph);
        debug!(request = %request.request_id, resources = request.order.len(), "submitting to engine");

        match self.engine.apply(&request).await {
            Ok(report) => {
                info!(request = %report.request_id, applied = report.applied.len(), "stack applied");
                Ok(report)
            }
            Err(e) => {
                warn!(request = %request.request_id, error = %e, "engine apply failed");
                Err(e.into())
            }
        }
    }
}
