//! Immutable, validated resource graph.
//!
//! A [`ResourceGraph`] can only be obtained through [`GraphBuilder::build`] or
//! [`ResourceGraph::from_declarations`] (also used by deserialization), both of
//! which run the full validation pass. Once built the graph never changes.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use spotrun_model::{Declaration, ModelError, ModelResult, Resource, ResourceId, ResourceKind};

mod builder;
pub use builder::{
    ClusterHandle, GraphBuilder, IdentityHandle, NetworkHandle, PolicyHandle, ServiceHandle,
    TaskSpecHandle,
};

/// Write-once set of resource declarations plus the dependency edges between them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct ResourceGraph {
    /// Declarations in insertion order.
    resources: Vec<Declaration>,
    #[serde(skip)]
    index: BTreeMap<ResourceId, usize>,
    #[serde(skip)]
    order: Vec<ResourceId>,
}

#[derive(Deserialize)]
struct RawGraph {
    resources: Vec<Declaration>,
}

impl TryFrom<RawGraph> for ResourceGraph {
    type Error = ModelError;
    fn try_from(raw: RawGraph) -> ModelResult<Self> {
        ResourceGraph::from_declarations(raw.resources)
    }
}

impl ResourceGraph {
    /// Validate declarations and freeze them into a graph.
    ///
    /// Checks, in order:
    /// - logical ids are unique;
    /// - every descriptor satisfies its own invariants;
    /// - every reference resolves to a resource of the expected kind;
    /// - at most one service is declared;
    /// - every strategy provider is enabled on the service's cluster;
    /// - the reference graph is acyclic.
    ///
    /// With kind-checked references every edge points from a dependent kind to a
    /// kind it requires (network and role are leaves), so a graph that passes the
    /// reference check never reaches the cycle error.
    pub fn from_declarations(resources: Vec<Declaration>) -> ModelResult<Self> {
        let mut index = BTreeMap::new();
        for (pos, decl) in resources.iter().enumerate() {
            if index.insert(decl.id.clone(), pos).is_some() {
                return Err(ModelError::DuplicateId(decl.id.to_string()));
            }
        }

        for decl in &resources {
            decl.spec.validate(&decl.id)?;
            for reference in decl.spec.references() {
                let target = index
                    .get(&reference.target)
                    .map(|&pos| &resources[pos])
                    .ok_or_else(|| ModelError::UnresolvedReference {
                        from: decl.id.to_string(),
                        to: reference.target.to_string(),
                    })?;

                let actual = target.spec.kind();
                if actual != reference.expects {
                    return Err(ModelError::ReferenceKind {
                        from: decl.id.to_string(),
                        to: reference.target.to_string(),
                        expected: reference.expects.as_str(),
                        actual: actual.as_str(),
                    });
                }
            }
        }

        check_single_service(&resources)?;
        check_strategy_providers(&resources, &index)?;

        let order = topological_order(&resources, &index)?;
        trace!(resources = resources.len(), "resource graph validated");

        Ok(Self {
            resources,
            index,
            order,
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.index.get(id).map(|&pos| &self.resources[pos].spec)
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.resources.iter()
    }

    /// Declarations of one kind, in insertion order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Declaration> {
        self.resources.iter().filter(move |d| d.spec.kind() == kind)
    }

    /// Ids in an order where every resource follows all of its dependencies.
    ///
    /// Among resources whose dependencies are satisfied, earlier-declared ones come first,
    /// so the order is stable for a given set of declarations.
    pub fn apply_order(&self) -> &[ResourceId] {
        &self.order
    }

    /// Distinct direct dependencies of `id`, in reference order.
    pub fn dependencies(&self, id: &ResourceId) -> Vec<&ResourceId> {
        let Some(&pos) = self.index.get(id) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        self.resources[pos]
            .spec
            .references()
            .into_iter()
            .filter(|r| seen.insert(r.target.clone()))
            .filter_map(|r| self.index.get_key_value(&r.target).map(|(k, _)| k))
            .collect()
    }

    /// Resources that reference `id` directly, in insertion order.
    pub fn dependents(&self, id: &ResourceId) -> Vec<&ResourceId> {
        self.resources
            .iter()
            .filter(|d| d.spec.references().iter().any(|r| &r.target == id))
            .map(|d| &d.id)
            .collect()
    }
}

fn check_single_service(resources: &[Declaration]) -> ModelResult<()> {
    let mut services = resources
        .iter()
        .filter(|d| d.spec.kind() == ResourceKind::Service);

    if let (Some(first), Some(_)) = (services.next(), services.next()) {
        return Err(ModelError::DuplicateService {
            existing: first.id.to_string(),
        });
    }
    Ok(())
}

fn check_strategy_providers(
    resources: &[Declaration],
    index: &BTreeMap<ResourceId, usize>,
) -> ModelResult<()> {
    for decl in resources {
        let Resource::Service(svc) = &decl.spec else {
            continue;
        };
        let Some(Resource::Cluster(cluster)) = index.get(&svc.cluster).map(|&p| &resources[p].spec)
        else {
            continue;
        };
        for entry in &svc.capacity_provider_strategies {
            if !cluster.enables(entry.capacity_provider) {
                return Err(ModelError::ProviderNotEnabled {
                    provider: entry.capacity_provider.to_string(),
                    cluster: svc.cluster.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm over declaration positions; ties resolve to the lowest position.
fn topological_order(
    resources: &[Declaration],
    index: &BTreeMap<ResourceId, usize>,
) -> ModelResult<Vec<ResourceId>> {
    let n = resources.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (pos, decl) in resources.iter().enumerate() {
        let deps: BTreeSet<usize> = decl
            .spec
            .references()
            .iter()
            .filter_map(|r| index.get(&r.target).copied())
            .collect();
        in_degree[pos] = deps.len();
        for dep in deps {
            dependents[dep].push(pos);
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&p| in_degree[p] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(pos) = ready.pop_first() {
        order.push(resources[pos].id.clone());
        for &next in &dependents[pos] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() != n {
        let stuck = (0..n)
            .find(|&p| in_degree[p] > 0)
            .map(|p| resources[p].id.to_string())
            .unwrap_or_default();
        return Err(ModelError::Cycle(stuck));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{config::StackConfig, profile::runner_stack};
    use spotrun_model::{
        CapacityProvider, CapacityProviderStrategy, ClusterSpec, NetworkSpec, ServiceSpec,
    };

    fn id(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn decl(name: &str, spec: Resource) -> Declaration {
        Declaration { id: id(name), spec }
    }

    fn network(name: &str) -> Declaration {
        decl(name, Resource::Network(NetworkSpec { max_azs: 2 }))
    }

    fn cluster(name: &str, net: &str, providers: &[CapacityProvider]) -> Declaration {
        decl(
            name,
            Resource::Cluster(ClusterSpec {
                network: id(net),
                capacity_providers: providers.iter().copied().collect::<BTreeSet<_>>(),
            }),
        )
    }

    #[test]
    fn orders_dependencies_first_even_when_declared_late() {
        let graph = ResourceGraph::from_declarations(vec![
            cluster("Cluster", "Vpc", &[CapacityProvider::FargateSpot]),
            network("Vpc"),
        ])
        .unwrap();

        assert_eq!(graph.apply_order(), &[id("Vpc"), id("Cluster")]);
        assert_eq!(graph.dependencies(&id("Cluster")), vec![&id("Vpc")]);
        assert_eq!(graph.dependents(&id("Vpc")), vec![&id("Cluster")]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ResourceGraph::from_declarations(vec![network("Vpc"), network("Vpc")]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateId("Vpc".into()));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let err = ResourceGraph::from_declarations(vec![cluster(
            "Cluster",
            "Missing",
            &[CapacityProvider::FargateSpot],
        )])
        .unwrap_err();

        assert_eq!(
            err,
            ModelError::UnresolvedReference {
                from: "Cluster".into(),
                to: "Missing".into()
            }
        );
    }

    #[test]
    fn reference_to_wrong_kind_is_rejected() {
        let err = ResourceGraph::from_declarations(vec![
            network("Vpc"),
            cluster("Cluster", "Vpc", &[CapacityProvider::FargateSpot]),
            cluster("Nested", "Cluster", &[CapacityProvider::FargateSpot]),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ModelError::ReferenceKind {
                expected: "network",
                actual: "cluster",
                ..
            }
        ));
    }

    #[test]
    fn strategy_provider_must_be_enabled_on_cluster() {
        let err = ResourceGraph::from_declarations(vec![
            network("Vpc"),
            cluster("Cluster", "Vpc", &[CapacityProvider::Fargate]),
            decl(
                "Role",
                Resource::Role(spotrun_model::RoleSpec {
                    assumed_by: spotrun_model::ServicePrincipal::ecs_tasks(),
                    managed_policies: vec![],
                }),
            ),
            decl(
                "TaskDef",
                Resource::TaskDefinition(spotrun_model::TaskDefinitionSpec {
                    size: spotrun_model::TaskSize {
                        cpu: 256,
                        memory_mib: 512,
                    },
                    task_role: id("Role"),
                    containers: vec![spotrun_model::ContainerSpec {
                        name: "app".into(),
                        image: spotrun_model::ImageRef::from_registry("busybox"),
                        environment: Default::default(),
                        logging: spotrun_model::LogSink::new("app"),
                    }],
                }),
            ),
            decl(
                "Service",
                Resource::Service(ServiceSpec {
                    cluster: id("Cluster"),
                    task_definition: id("TaskDef"),
                    security_groups: vec![],
                    desired_count: 1,
                    capacity_provider_strategies: vec![
                        CapacityProviderStrategy::new(CapacityProvider::FargateSpot, 1).unwrap(),
                    ],
                }),
            ),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ModelError::ProviderNotEnabled {
                provider: "FARGATE_SPOT".into(),
                cluster: "Cluster".into()
            }
        );
    }

    #[test]
    fn deserialization_revalidates() {
        let json = r#"{"resources":[{"id":"Cluster","spec":{"cluster":{"network":"Vpc","capacityProviders":["FARGATE_SPOT"]}}}]}"#;
        let err = serde_json::from_str::<ResourceGraph>(json).unwrap_err();
        assert!(err.to_string().contains("references unknown resource"));
    }

    #[test]
    fn deserialization_rejects_untrusted_role_principal() {
        let graph = runner_stack(&StackConfig::default()).unwrap();
        let json = serde_json::to_string(&graph)
            .unwrap()
            .replace("ecs-tasks.amazonaws.com", "ec2.amazonaws.com");

        let err = serde_json::from_str::<ResourceGraph>(&json).unwrap_err();
        assert!(err.to_string().contains("may only be assumed by"), "{err}");
    }

    #[test]
    fn self_reference_is_reported_as_cycle() {
        let resources = vec![cluster("Cluster", "Cluster", &[CapacityProvider::FargateSpot])];
        let index = BTreeMap::from([(id("Cluster"), 0)]);

        let err = topological_order(&resources, &index).unwrap_err();
        assert_eq!(err, ModelError::Cycle("Cluster".into()));

        let err = ResourceGraph::from_declarations(resources).unwrap_err();
        assert!(matches!(err, ModelError::ReferenceKind { .. }));
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = ResourceGraph::from_declarations(vec![]).unwrap();
        assert!(graph.is_empty());
        assert!(graph.apply_order().is_empty());
    }
}
