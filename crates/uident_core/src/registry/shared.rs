//! Shared registry handle with single-writer/concurrent-reader discipline.
//!
//! # Responsibility
//! - Serialize mutations through one write lock so uniqueness and version
//!   bumps stay consistent.
//! - Let readers run concurrently and observe consistent snapshots.
//!
//! # Invariants
//! - Every mutation inserts or removes whole entries, so a panicked writer
//!   cannot leave a torn record; lock poisoning is therefore recovered.
//! - `snapshot` returns an independent copy that later mutations never touch.

use crate::grammar::GrammarTable;
use crate::model::resource::ResourceDescriptor;
use crate::model::uid::Uid;
use crate::registry::{Registry, RegistryEntry, RegistryResult, ValidationIssue};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to one registry instance.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already populated registry.
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Registers one identifier, rejecting duplicates.
    pub fn register(
        &self,
        uid: &Uid,
        resource: ResourceDescriptor,
    ) -> RegistryResult<RegistryEntry> {
        self.write().register(uid, resource)
    }

    /// Registers one identifier, replacing any existing entry.
    pub fn register_overwrite(
        &self,
        uid: &Uid,
        resource: ResourceDescriptor,
    ) -> RegistryResult<RegistryEntry> {
        self.write().register_overwrite(uid, resource)
    }

    /// Resolves one identifier to its resource descriptor.
    pub fn resolve(&self, uid: &Uid) -> RegistryResult<ResourceDescriptor> {
        self.read().resolve(uid)
    }

    /// Returns the full entry for one identifier, if registered.
    pub fn entry(&self, uid: &Uid) -> Option<RegistryEntry> {
        self.read().entry(uid).cloned()
    }

    /// Removes one identifier and returns its entry.
    pub fn deregister(&self, uid: &Uid) -> RegistryResult<RegistryEntry> {
        self.write().deregister(uid)
    }

    /// Follows the `type_ref` chain from one identifier to its terminal UID.
    pub fn resolve_type_ref(&self, uid: &Uid) -> RegistryResult<Uid> {
        self.read().resolve_type_ref(uid)
    }

    /// Scans current state and reports every issue found.
    pub fn validate_all(&self, grammar: &GrammarTable) -> Vec<ValidationIssue> {
        self.read().validate_all(grammar)
    }

    /// Returns an independent copy for torn-read-free iteration.
    pub fn snapshot(&self) -> Registry {
        self.read().clone()
    }

    /// Returns registered canonical forms in sorted order.
    pub fn uids(&self) -> Vec<String> {
        self.read().uids()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::SharedRegistry;
    use crate::model::resource::ResourceDescriptor;
    use crate::model::uid::Uid;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let registry = SharedRegistry::new();
        let clone = registry.clone();

        let uid = Uid::new("servokiss", "aiagents", "class", "UserAgent");
        registry
            .register(&uid, ResourceDescriptor::new("src/user_agent.rs"))
            .unwrap();

        assert_eq!(clone.len(), 1);
        assert_eq!(
            clone.resolve(&uid).unwrap(),
            ResourceDescriptor::new("src/user_agent.rs")
        );
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutations() {
        let registry = SharedRegistry::new();
        let uid = Uid::new("servokiss", "aiagents", "class", "UserAgent");
        registry
            .register(&uid, ResourceDescriptor::new("src/user_agent.rs"))
            .unwrap();

        let snapshot = registry.snapshot();
        registry.deregister(&uid).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn concurrent_writers_serialize_registrations() {
        let registry = SharedRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let uid =
                        Uid::new("servokiss", "aiagents", "function", format!("worker{worker}"));
                    registry
                        .register(&uid, ResourceDescriptor::new("src/workers.rs"))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
