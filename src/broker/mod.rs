//! The `broker` module holds the state shared by all connections: the topic
//! broker, the identity registry and the context that bundles them.

pub mod context;
pub mod engine;
pub mod registry;
pub mod topic;

pub use context::SessionContext;
pub use engine::PubSub;
pub use registry::IdentityRegistry;
