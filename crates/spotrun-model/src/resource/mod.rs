//! Resource descriptors making up a deployment graph.
//!
//! Each descriptor is a plain value; references to other resources are carried
//! as [`ResourceId`]s and resolved by the graph layer.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{domain::ResourceId, error::ModelResult};

mod network;
pub use network::NetworkSpec;

mod cluster;
pub use cluster::ClusterSpec;

mod identity;
pub use identity::{ManagedPolicy, RoleSpec, ServicePrincipal};

mod task;
pub use task::{ContainerSpec, ImageRef, LogSink, TaskDefinitionSpec};

mod security;
pub use security::{IngressRule, SecurityGroupSpec};

mod service;
pub use service::ServiceSpec;

/// Discriminant of a [`Resource`], used when checking reference targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Network,
    Cluster,
    Role,
    TaskDefinition,
    SecurityGroup,
    Service,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Cluster => "cluster",
            ResourceKind::Role => "role",
            ResourceKind::TaskDefinition => "taskDefinition",
            ResourceKind::SecurityGroup => "securityGroup",
            ResourceKind::Service => "service",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed edge from a resource to one of its dependencies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub target: ResourceId,
    /// Kind the target must have.
    pub expects: ResourceKind,
}

impl Reference {
    fn to(target: &ResourceId, expects: ResourceKind) -> Self {
        Self {
            target: target.clone(),
            expects,
        }
    }
}

/// Any resource the deployment graph can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Network(NetworkSpec),
    Cluster(ClusterSpec),
    Role(RoleSpec),
    TaskDefinition(TaskDefinitionSpec),
    SecurityGroup(SecurityGroupSpec),
    Service(ServiceSpec),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Network(_) => ResourceKind::Network,
            Resource::Cluster(_) => ResourceKind::Cluster,
            Resource::Role(_) => ResourceKind::Role,
            Resource::TaskDefinition(_) => ResourceKind::TaskDefinition,
            Resource::SecurityGroup(_) => ResourceKind::SecurityGroup,
            Resource::Service(_) => ResourceKind::Service,
        }
    }

    /// Outgoing references, in declaration order.
    pub fn references(&self) -> Vec<Reference> {
        match self {
            Resource::Network(_) | Resource::Role(_) => Vec::new(),
            Resource::Cluster(c) => vec![Reference::to(&c.network, ResourceKind::Network)],
            Resource::TaskDefinition(t) => vec![Reference::to(&t.task_role, ResourceKind::Role)],
            Resource::SecurityGroup(sg) => {
                vec![Reference::to(&sg.network, ResourceKind::Network)]
            }
            Resource::Service(s) => {
                let mut refs = vec![
                    Reference::to(&s.cluster, ResourceKind::Cluster),
                    Reference::to(&s.task_definition, ResourceKind::TaskDefinition),
                ];
                refs.extend(
                    s.security_groups
                        .iter()
                        .map(|sg| Reference::to(sg, ResourceKind::SecurityGroup)),
                );
                refs
            }
        }
    }

    /// Check the descriptor's own invariants. References are not resolved here.
    pub fn validate(&self, id: &ResourceId) -> ModelResult<()> {
        match self {
            Resource::Network(n) => n.validate(),
            Resource::Cluster(c) => c.validate(),
            Resource::Role(r) => r.validate(),
            Resource::TaskDefinition(t) => t.validate(id),
            Resource::SecurityGroup(sg) => sg.validate(),
            Resource::Service(s) => s.validate(),
        }
    }
}

/// A resource together with its logical id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: ResourceId,
    pub spec: Resource,
}
