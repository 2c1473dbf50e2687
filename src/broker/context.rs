use tracing::debug;

use crate::broker::engine::PubSub;
use crate::broker::registry::IdentityRegistry;

/// Process-wide broker state shared by every connection.
///
/// Built once at startup and handed to each connection as
/// `Arc<SessionContext>`. Both members synchronize internally.
#[derive(Debug, Default)]
pub struct SessionContext {
    registry: IdentityRegistry,
    pubsub: PubSub,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            registry: IdentityRegistry::new(),
            pubsub: PubSub::new(),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn pubsub(&self) -> &PubSub {
        &self.pubsub
    }

    /// Releases everything `id` holds: the identifier itself, then every
    /// subscription. Safe to call more than once.
    ///
    /// The identifier is freed only while the broker's write lock is held, so
    /// a new session claiming it cannot subscribe before the old
    /// subscriptions are gone.
    pub async fn release(&self, id: &str) {
        let mut was_registered = false;
        let closed = self
            .pubsub
            .unsubscribe_all_with(id, || was_registered = self.registry.unregister(id))
            .await;
        debug!(id, was_registered, closed, "Released client state");
    }
}
