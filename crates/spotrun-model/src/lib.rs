mod domain;
pub use domain::constants;
pub use domain::{Cidr, Env, EnvVar, Flag, Protocol, ReplicaCount, ResourceId, TaskSize};

mod error;
pub use error::{ModelError, ModelResult};

mod resource;
pub use resource::{
    ClusterSpec, ContainerSpec, Declaration, ImageRef, IngressRule, LogSink, ManagedPolicy,
    NetworkSpec, Reference, Resource, ResourceKind, RoleSpec, SecurityGroupSpec, ServicePrincipal,
    ServiceSpec, TaskDefinitionSpec,
};

mod strategy;
pub use strategy::{CapacityProvider, CapacityProviderStrategy, validate_strategy, weight_share};
