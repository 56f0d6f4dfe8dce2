use async_trait::async_trait;
use tracing::{info, instrument};

use super::{ApplyReport, ApplyRequest, ProvisioningEngine, ProvisioningError};

/// Engine that walks the apply order and logs each resource without touching a provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunEngine;

impl DryRunEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvisioningEngine for DryRunEngine {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    #[instrument(level = "debug", skip(self, request), fields(request = %request.request_id, stack = %request.stack_name))]
    async fn apply(&self, request: &ApplyRequest) -> Result<ApplyReport, ProvisioningError> {
        let mut applied = Vec::with_capacity(request.order.len());

        for (step, id) in request.order.iter().enumerate() {
            let Some(spec) = request.graph.get(id) else {
                return Err(ProvisioningError::Internal(format!(
                    "apply order names {id}, which is not in the graph"
                )));
            };
            info!(step = step + 1, resource = %id, kind = %spec.kind(), "would create");
            applied.push(id.clone());
        }

        Ok(ApplyReport {
            request_id: request.request_id,
            engine: self.name().to_string(),
            applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StackConfig, profile::runner_stack};

    #[tokio::test]
    async fn reports_every_resource_in_order() {
        let graph = runner_stack(&StackConfig::default()).unwrap();
        let request = ApplyRequest::new("Test", graph.clone());

        let report = DryRunEngine::new().apply(&request).await.unwrap();

        assert_eq!(report.request_id, request.request_id);
        assert_eq!(report.engine, "dry-run");
        assert_eq!(report.applied, graph.apply_order().to_vec());
    }

    #[tokio::test]
    async fn unknown_id_in_order_is_internal_error() {
        let graph = runner_stack(&StackConfig::default()).unwrap();
        let mut request = ApplyRequest::new("Test", graph);
        request
            .order
            .push(spotrun_model::ResourceId::new("Ghost").unwrap());

        let err = DryRunEngine::new().apply(&request).await.unwrap_err();
        assert!(matches!(err, ProvisioningError::Internal(_)));
    }
}
