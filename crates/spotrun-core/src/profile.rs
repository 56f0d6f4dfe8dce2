//! The spot CI runner deployment: one network, one cluster on preemptible capacity,
//! one role, one single-container task, one security group and one service.
use tracing::{info, instrument};

use spotrun_model::{
    CapacityProvider, CapacityProviderStrategy, Cidr, Env, ImageRef, IngressRule, ManagedPolicy,
    ReplicaCount, ServicePrincipal,
    constants::{
        ENV_GITHUB_OWNER, ENV_GITHUB_PAT, ENV_GITHUB_REPOSITORY, ENV_RUNNER_LABELS,
        ENV_RUNNER_REPOSITORY_URL, ENV_RUNNER_WORKDIR,
    },
};

use crate::{
    config::{GithubConfig, StackConfig},
    error::CoreError,
    graph::{GraphBuilder, ResourceGraph},
};

pub const NETWORK_ID: &str = "Vpc";
pub const CLUSTER_ID: &str = "FargateSpotRunnerCluster";
pub const TASK_ROLE_ID: &str = "FargateSpotRunnerTaskRole";
pub const TASK_DEF_ID: &str = "FargateSpotRunnerTaskDef";
pub const SECURITY_GROUP_ID: &str = "FargateSpotRunnerSecurityGroup";
pub const SERVICE_ID: &str = "FargateSpotRunnerService";
pub const CONTAINER_NAME: &str = "Runner";

pub const RUNNER_MAX_AZS: u32 = 2;
pub const RUNNER_CPU: u32 = 1024;
pub const RUNNER_MEMORY_MIB: u32 = 2048;
pub const RUNNER_DESIRED_COUNT: ReplicaCount = 1;
pub const RUNNER_IMAGE: &str = "myoung34/github-runner:latest";
pub const RUNNER_LOG_PREFIX: &str = "FargateSpotRunner";
pub const RUNNER_WORKDIR: &str = "/tmp/github-runner";
pub const RUNNER_LABELS: &str = "fargate-spot";

pub const REGISTRY_READ_POLICY: &str = "AmazonEC2ContainerRegistryReadOnly";
pub const TELEMETRY_WRITE_POLICY: &str = "CloudWatchAgentServerPolicy";

pub const SSH_PORT: u16 = 22;
pub const SSH_RULE_DESCRIPTION: &str = "Allow SSH access";

/// Container environment for the runner.
///
/// Always carries exactly the six runner keys, in a fixed order. Unset inputs are
/// present with an empty value; `RUNNER_WORKDIR` and `RUNNER_LABELS` are not configurable.
pub fn runner_env(github: &GithubConfig) -> Env {
    Env::new()
        .with(ENV_GITHUB_PAT, github.personal_token.expose())
        .with(ENV_RUNNER_WORKDIR, RUNNER_WORKDIR)
        .with(ENV_RUNNER_REPOSITORY_URL, github.repository_url.as_str())
        .with(ENV_RUNNER_LABELS, RUNNER_LABELS)
        .with(ENV_GITHUB_OWNER, github.username.as_str())
        .with(ENV_GITHUB_REPOSITORY, github.repository_name.as_str())
}

/// Build the runner stack graph with its fixed sizing.
pub fn runner_stack(cfg: &StackConfig) -> Result<ResourceGraph, CoreError> {
    runner_stack_with(cfg, RUNNER_CPU, RUNNER_MEMORY_MIB)
}

/// Build the runner stack graph with an explicit CPU/memory pair.
///
/// Fails with [`CoreError::Configuration`] before declaring anything else if the
/// pair is not a supported combination.
#[instrument(level = "debug", skip(cfg), fields(stack = %cfg.stack_name))]
pub fn runner_stack_with(
    cfg: &StackConfig,
    cpu: u32,
    memory_mib: u32,
) -> Result<ResourceGraph, CoreError> {
    let mut b = GraphBuilder::new();

    let vpc = b.create_network(NETWORK_ID, RUNNER_MAX_AZS)?;
    let cluster = b.create_cluster(CLUSTER_ID, &vpc, [CapacityProvider::FargateSpot])?;

    let role = b.create_task_identity(
        TASK_ROLE_ID,
        ServicePrincipal::ecs_tasks(),
        vec![
            ManagedPolicy::aws_managed(REGISTRY_READ_POLICY),
            ManagedPolicy::aws_managed(TELEMETRY_WRITE_POLICY),
        ],
    )?;

    let task = b.define_task(TASK_DEF_ID, cpu, memory_mib, &role)?;
    b.attach_container(
        &task,
        CONTAINER_NAME,
        ImageRef::from_registry(RUNNER_IMAGE),
        runner_env(&cfg.github),
        RUNNER_LOG_PREFIX,
    )?;

    // Open to every source; kept as deployed, see DESIGN.md.
    let sg = b.create_access_policy(SECURITY_GROUP_ID, &vpc)?;
    b.add_ingress_rule(
        &sg,
        IngressRule::tcp(SSH_PORT, Cidr::any_ipv4()).with_description(SSH_RULE_DESCRIPTION),
    )?;

    b.place_service(
        SERVICE_ID,
        &cluster,
        &task,
        &[sg],
        RUNNER_DESIRED_COUNT,
        vec![CapacityProviderStrategy::new(CapacityProvider::FargateSpot, 1)?],
    )?;

    let graph = b.build()?;
    info!(resources = graph.len(), "runner stack assembled");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;
    use spotrun_model::{
        ModelError, Protocol, Resource, ResourceId, ResourceKind, constants::RUNNER_ENV_KEYS,
        weight_share,
    };

    fn full_config() -> StackConfig {
        StackConfig {
            stack_name: "Test".into(),
            github: GithubConfig {
                personal_token: Secret::new("ghp_token"),
                repository_url: "https://github.com/acme/app".into(),
                username: "acme".into(),
                repository_name: "app".into(),
            },
        }
    }

    fn id(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn container_env(graph: &ResourceGraph) -> Env {
        let Some(Resource::TaskDefinition(task)) = graph.get(&id(TASK_DEF_ID)) else {
            panic!("task definition missing");
        };
        task.container()
            .expect("runner container")
            .environment
            .clone()
    }

    #[test]
    fn all_inputs_set_populate_every_key() {
        let graph = runner_stack(&full_config()).unwrap();
        let env = container_env(&graph);

        assert_eq!(env.keys().collect::<Vec<_>>(), RUNNER_ENV_KEYS.to_vec());
        assert_eq!(env.get(ENV_GITHUB_PAT), Some("ghp_token"));
        assert_eq!(
            env.get(ENV_RUNNER_REPOSITORY_URL),
            Some("https://github.com/acme/app")
        );
        assert_eq!(env.get(ENV_GITHUB_OWNER), Some("acme"));
        assert_eq!(env.get(ENV_GITHUB_REPOSITORY), Some("app"));
        assert_eq!(env.get(ENV_RUNNER_WORKDIR), Some("/tmp/github-runner"));
        assert_eq!(env.get(ENV_RUNNER_LABELS), Some("fargate-spot"));
    }

    #[test]
    fn no_inputs_yield_empty_values_not_missing_keys() {
        let cfg = StackConfig::from_lookup(|_| None);
        let env = container_env(&runner_stack(&cfg).unwrap());

        assert_eq!(env.len(), 6);
        for key in [
            ENV_GITHUB_PAT,
            ENV_RUNNER_REPOSITORY_URL,
            ENV_GITHUB_OWNER,
            ENV_GITHUB_REPOSITORY,
        ] {
            assert_eq!(env.get(key), Some(""), "{key} should be empty");
        }
        assert_eq!(env.get(ENV_RUNNER_WORKDIR), Some("/tmp/github-runner"));
        assert_eq!(env.get(ENV_RUNNER_LABELS), Some("fargate-spot"));
    }

    #[test]
    fn invalid_sizing_fails_with_configuration_error() {
        let err = runner_stack_with(&full_config(), 1024, 512).unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(
            err,
            CoreError::Configuration(ModelError::InvalidTaskSize {
                cpu: 1024,
                memory_mib: 512
            })
        ));
    }

    #[test]
    fn construction_is_deterministic() {
        let a = runner_stack(&full_config()).unwrap();
        let b = runner_stack(&full_config()).unwrap();

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn ssh_rule_is_always_present() {
        for cfg in [full_config(), StackConfig::default()] {
            let graph = runner_stack(&cfg).unwrap();
            let Some(Resource::SecurityGroup(sg)) = graph.get(&id(SECURITY_GROUP_ID)) else {
                panic!("security group missing");
            };
            assert_eq!(sg.ingress_rules.len(), 1);
            assert!(sg.ingress_rules[0].is_open(Protocol::Tcp, 22));
            assert_eq!(sg.ingress_rules[0].source.to_string(), "0.0.0.0/0");
        }
    }

    #[test]
    fn service_runs_one_replica_on_spot() {
        let graph = runner_stack(&full_config()).unwrap();
        let Some(Resource::Service(svc)) = graph.get(&id(SERVICE_ID)) else {
            panic!("service missing");
        };

        assert_eq!(svc.desired_count, 1);
        assert_eq!(svc.capacity_provider_strategies.len(), 1);
        let entry = svc.capacity_provider_strategies[0];
        assert_eq!(entry.capacity_provider, CapacityProvider::FargateSpot);
        assert_eq!(entry.weight, 1);
        assert_eq!(
            weight_share(
                &svc.capacity_provider_strategies,
                CapacityProvider::FargateSpot
            ),
            Some(1.0)
        );
        assert_eq!(svc.security_groups, vec![id(SECURITY_GROUP_ID)]);
    }

    #[test]
    fn role_trusts_task_runtime_with_both_policies() {
        let graph = runner_stack(&full_config()).unwrap();
        let Some(Resource::Role(role)) = graph.get(&id(TASK_ROLE_ID)) else {
            panic!("role missing");
        };

        assert_eq!(role.assumed_by, ServicePrincipal::ecs_tasks());
        let names: Vec<_> = role.managed_policies.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec![REGISTRY_READ_POLICY, TELEMETRY_WRITE_POLICY]);
    }

    #[test]
    fn apply_order_follows_dependencies() {
        let graph = runner_stack(&full_config()).unwrap();
        let order: Vec<_> = graph.apply_order().iter().map(|id| id.as_str()).collect();

        assert_eq!(
            order,
            vec![
                NETWORK_ID,
                CLUSTER_ID,
                TASK_ROLE_ID,
                TASK_DEF_ID,
                SECURITY_GROUP_ID,
                SERVICE_ID
            ]
        );

        let pos = |s: &str| order.iter().position(|o| *o == s).unwrap();
        for decl in graph.iter() {
            for dep in graph.dependencies(&decl.id) {
                assert!(pos(dep.as_str()) < pos(decl.id.as_str()));
            }
        }
        assert_eq!(graph.of_kind(ResourceKind::Service).count(), 1);
    }

    #[test]
    fn task_sizing_and_container_are_fixed() {
        let graph = runner_stack(&StackConfig::default()).unwrap();
        let Some(Resource::TaskDefinition(task)) = graph.get(&id(TASK_DEF_ID)) else {
            panic!("task definition missing");
        };

        assert_eq!(task.size.cpu, 1024);
        assert_eq!(task.size.memory_mib, 2048);
        assert_eq!(task.task_role, id(TASK_ROLE_ID));

        let c = task.container().unwrap();
        assert_eq!(c.name, CONTAINER_NAME);
        assert_eq!(c.image.as_str(), RUNNER_IMAGE);
        assert_eq!(c.logging.stream_prefix, RUNNER_LOG_PREFIX);
    }
}
