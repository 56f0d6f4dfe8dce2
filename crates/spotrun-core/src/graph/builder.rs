use tracing::{debug, info, instrument, warn};

use spotrun_model::{
    CapacityProvider, CapacityProviderStrategy, ClusterSpec, ContainerSpec, Declaration, Env, Flag, ImageRef,
    IngressRule, LogSink, ManagedPolicy, ModelError, NetworkSpec, ReplicaCount, Resource,
    ResourceId, RoleSpec, SecurityGroupSpec, ServicePrincipal, ServiceSpec, TaskDefinitionSpec,
    TaskSize, validate_strategy,
};

use super::ResourceGraph;
use crate::error::CoreError;

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name(ResourceId);

        impl $name {
            pub fn id(&self) -> &ResourceId {
                &self.0
            }
        }
    };
}

handle!(
    /// Reference to a declared network.
    NetworkHandle
);
handle!(
    /// Reference to a declared compute cluster.
    ClusterHandle
);
handle!(
    /// Reference to a declared task identity (role).
    IdentityHandle
);
handle!(
    /// Reference to a declared task definition.
    TaskSpecHandle
);
handle!(
    /// Reference to a declared access policy (security group).
    PolicyHandle
);
handle!(
    /// Reference to the declared service placement.
    ServiceHandle
);

/// Assembles resource declarations and links them by id.
///
/// Each `create_*`/`define_*`/`place_*` call checks the descriptor's own invariants
/// immediately and returns a handle dependents use to reference it. [`GraphBuilder::build`]
/// runs the whole-graph validation and freezes the result.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    resources: Vec<Declaration>,
    service: Option<ResourceId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an isolated network spanning up to `max_availability_domains` zones.
    pub fn create_network(
        &mut self,
        id: &str,
        max_availability_domains: u32,
    ) -> Result<NetworkHandle, CoreError> {
        let spec = NetworkSpec::new(max_availability_domains)?;
        let id = self.declare(id, Resource::Network(spec))?;
        Ok(NetworkHandle(id))
    }

    /// Declare a cluster in `network` with the given capacity providers enabled.
    pub fn create_cluster(
        &mut self,
        id: &str,
        network: &NetworkHandle,
        capacity_providers: impl IntoIterator<Item = CapacityProvider>,
    ) -> Result<ClusterHandle, CoreError> {
        let spec = ClusterSpec {
            network: network.0.clone(),
            capacity_providers: capacity_providers.into_iter().collect(),
        };
        spec.validate()?;
        let id = self.declare(id, Resource::Cluster(spec))?;
        Ok(ClusterHandle(id))
    }

    /// Declare a role assumable by `trusted_principal` with the given managed policies.
    pub fn create_task_identity(
        &mut self,
        id: &str,
        trusted_principal: ServicePrincipal,
        managed_policies: Vec<ManagedPolicy>,
    ) -> Result<IdentityHandle, CoreError> {
        if managed_policies.is_empty() {
            warn!(role = id, "role has no managed policies attached");
        }
        let spec = RoleSpec {
            assumed_by: trusted_principal,
            managed_policies,
        };
        spec.validate()?;
        let id = self.declare(id, Resource::Role(spec))?;
        Ok(IdentityHandle(id))
    }

    /// Declare a task definition running as `identity`. Containers are attached separately.
    pub fn define_task(
        &mut self,
        id: &str,
        cpu: u32,
        memory_mib: u32,
        identity: &IdentityHandle,
    ) -> Result<TaskSpecHandle, CoreError> {
        let spec = TaskDefinitionSpec {
            size: TaskSize::new(cpu, memory_mib)?,
            task_role: identity.0.clone(),
            containers: Vec::new(),
        };
        let id = self.declare(id, Resource::TaskDefinition(spec))?;
        Ok(TaskSpecHandle(id))
    }

    /// Attach the single container of a task definition.
    pub fn attach_container(
        &mut self,
        task: &TaskSpecHandle,
        name: &str,
        image: ImageRef,
        environment: Env,
        log_prefix: &str,
    ) -> Result<(), CoreError> {
        let container = ContainerSpec {
            name: name.to_string(),
            image,
            environment,
            logging: LogSink::new(log_prefix),
        };
        container.validate()?;

        let Resource::TaskDefinition(spec) = self.lookup_mut(&task.0)? else {
            return Err(wrong_kind(&task.0, "taskDefinition"));
        };
        if !spec.containers.is_empty() {
            return Err(ModelError::ContainerCount {
                task: task.0.to_string(),
                count: spec.containers.len() + 1,
            }
            .into());
        }
        debug!(
            task = %task.0,
            container = name,
            env = container.environment.len(),
            "container attached"
        );
        spec.containers.push(container);
        Ok(())
    }

    /// Declare an access policy in `network` with no ingress rules and open egress.
    pub fn create_access_policy(
        &mut self,
        id: &str,
        network: &NetworkHandle,
    ) -> Result<PolicyHandle, CoreError> {
        let spec = SecurityGroupSpec {
            network: network.0.clone(),
            ingress_rules: Vec::new(),
            allow_all_outbound: Flag::enabled(),
        };
        let id = self.declare(id, Resource::SecurityGroup(spec))?;
        Ok(PolicyHandle(id))
    }

    /// Append an ingress rule to an access policy.
    pub fn add_ingress_rule(
        &mut self,
        policy: &PolicyHandle,
        rule: IngressRule,
    ) -> Result<(), CoreError> {
        rule.validate()?;
        if rule.source.is_unrestricted() {
            warn!(
                policy = %policy.0,
                protocol = %rule.protocol,
                port = rule.port,
                "ingress rule admits every source address"
            );
        }

        let Resource::SecurityGroup(spec) = self.lookup_mut(&policy.0)? else {
            return Err(wrong_kind(&policy.0, "securityGroup"));
        };
        spec.ingress_rules.push(rule);
        Ok(())
    }

    /// Bind `task` to `cluster`. Only one service may be placed per graph.
    pub fn place_service(
        &mut self,
        id: &str,
        cluster: &ClusterHandle,
        task: &TaskSpecHandle,
        policies: &[PolicyHandle],
        desired_count: ReplicaCount,
        strategy: Vec<CapacityProviderStrategy>,
    ) -> Result<ServiceHandle, CoreError> {
        if let Some(existing) = &self.service {
            return Err(ModelError::DuplicateService {
                existing: existing.to_string(),
            }
            .into());
        }
        validate_strategy(&strategy)?;

        let spec = ServiceSpec {
            cluster: cluster.0.clone(),
            task_definition: task.0.clone(),
            security_groups: policies.iter().map(|p| p.0.clone()).collect(),
            desired_count,
            capacity_provider_strategies: strategy,
        };
        let id = self.declare(id, Resource::Service(spec))?;
        self.service = Some(id.clone());
        Ok(ServiceHandle(id))
    }

    /// Validate the whole graph and freeze it.
    #[instrument(level = "debug", skip(self), fields(resources = self.resources.len()))]
    pub fn build(self) -> Result<ResourceGraph, CoreError> {
        let graph = ResourceGraph::from_declarations(self.resources)?;
        info!(resources = graph.len(), "resource graph built");
        Ok(graph)
    }

    fn declare(&mut self, id: &str, spec: Resource) -> Result<ResourceId, CoreError> {
        let id = ResourceId::new(id)?;
        if self.resources.iter().any(|d| d.id == id) {
            return Err(ModelError::DuplicateId(id.to_string()).into());
        }
        debug!(resource = %id, kind = %spec.kind(), "resource declared");
        self.resources.push(Declaration {
            id: id.clone(),
            spec,
        });
        Ok(id)
    }

    fn lookup_mut(&mut self, id: &ResourceId) -> Result<&mut Resource, CoreError> {
        self.resources
            .iter_mut()
            .find(|d| &d.id == id)
            .map(|d| &mut d.spec)
            .ok_or_else(|| {
                ModelError::UnresolvedReference {
                    from: "builder".into(),
                    to: id.to_string(),
                }
                .into()
            })
    }
}

fn wrong_kind(id: &ResourceId, expected: &'static str) -> CoreError {
    ModelError::Invalid(format!("{id} is not a {expected}")).into()
}
