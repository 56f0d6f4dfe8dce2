//! Well-known names shared across the model layer.
//!
//! The runner container environment is keyed by a fixed set of names; keeping
//! them here gives the profile builder and its consumers one source of truth.

/// Upper bound on availability zones a network may span.
pub const MAX_AVAILABILITY_ZONES: u32 = 6;

/// Service principal of the container task runtime.
pub const ECS_TASKS_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";

/// Personal access token the runner registers with.
pub const ENV_GITHUB_PAT: &str = "GITHUB_PAT";
/// Scratch directory for job checkouts inside the runner container.
pub const ENV_RUNNER_WORKDIR: &str = "RUNNER_WORKDIR";
/// Repository the runner attaches to.
pub const ENV_RUNNER_REPOSITORY_URL: &str = "RUNNER_REPOSITORY_URL";
/// Labels advertised to the CI service for job routing.
pub const ENV_RUNNER_LABELS: &str = "RUNNER_LABELS";
pub const ENV_GITHUB_OWNER: &str = "GITHUB_OWNER";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";

/// Every key the runner container environment carries, in declaration order.
pub const RUNNER_ENV_KEYS: [&str; 6] = [
    ENV_GITHUB_PAT,
    ENV_RUNNER_WORKDIR,
    ENV_RUNNER_REPOSITORY_URL,
    ENV_RUNNER_LABELS,
    ENV_GITHUB_OWNER,
    ENV_GITHUB_REPOSITORY,
];
