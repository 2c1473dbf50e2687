use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::broker::topic::SubscriberId;
use crate::utils::error::BrokerError;

/// The set of identifiers currently held by live connections.
///
/// A single mutex guards the set; registrations are rare compared to
/// commands, so contention is not a concern.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: Mutex<HashSet<SubscriberId>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `id`. Fails with `IdentifierInUse` if another connection holds it.
    pub fn register(&self, id: &str) -> Result<(), BrokerError> {
        if self.lock().insert(id.to_string()) {
            Ok(())
        } else {
            Err(BrokerError::IdentifierInUse)
        }
    }

    /// Releases `id`. Returns false if it was not registered.
    pub fn unregister(&self, id: &str) -> bool {
        self.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<SubscriberId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
