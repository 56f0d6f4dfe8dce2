mod id;
pub use id::ResourceId;

mod env;
pub use env::{Env, EnvVar};

mod flag;
pub use flag::Flag;

mod net;
pub use net::{Cidr, Protocol};

mod size;
pub use size::TaskSize;

pub mod constants;

/// Desired number of running task replicas.
pub type ReplicaCount = u32;
