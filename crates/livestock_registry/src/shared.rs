//! Thread-safe handle over a single [`LivestockRegistry`]

use crate::config::RegistryConfig;
use crate::errors::*;
use crate::registry::{LivestockRegistry, RegistrySnapshot};
use crate::types::*;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to one registry instance.
///
/// Each mutation holds the write lock for its whole duration, so readers
/// never observe a record without its owner index entry or a counter that
/// has not caught up. Queries share the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<LivestockRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: LivestockRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::new(LivestockRegistry::with_config(config))
    }

    pub fn set_authority(&self, principal: Principal) -> Result<bool> {
        self.inner.write().set_authority(principal)
    }

    pub fn register(&self, registration: LivestockRegistration, ctx: &CallContext) -> Result<u64> {
        self.inner.write().register(registration, ctx)
    }

    pub fn update_status(
        &self,
        hash: &RecordHash,
        is_active: bool,
        ctx: &CallContext,
    ) -> Result<bool> {
        self.inner.write().update_status(hash, is_active, ctx)
    }

    pub fn transfer(
        &self,
        hash: &RecordHash,
        new_owner: Principal,
        ctx: &CallContext,
    ) -> Result<bool> {
        self.inner.write().transfer(hash, new_owner, ctx)
    }

    pub fn get_record(&self, hash: &RecordHash) -> Option<LivestockRecord> {
        self.inner.read().get_record(hash)
    }

    pub fn get_by_owner(&self, owner: &Principal) -> Vec<RecordHash> {
        self.inner.read().get_by_owner(owner)
    }

    pub fn get_count(&self) -> u64 {
        self.inner.read().get_count()
    }

    pub fn is_registered(&self, hash: &RecordHash) -> bool {
        self.inner.read().is_registered(hash)
    }

    pub fn authority(&self) -> Option<Principal> {
        self.inner.read().authority().cloned()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.inner.read().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_registrations_keep_counter_and_index_consistent() {
        let registry = SharedRegistry::default();
        registry.set_authority("AUTH".into()).unwrap();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let ctx = CallContext::new(format!("owner-{worker}"), 1_000);
                    for i in 0..25 {
                        let reg = LivestockRegistration::new(
                            format!("hash-{worker}-{i}"),
                            "Hereford",
                            i,
                            "",
                        );
                        registry.register(reg, &ctx).unwrap();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(registry.get_count(), 200);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.records.len(), 200);
        for (owner, hashes) in &snapshot.owners {
            assert_eq!(hashes.len(), 25);
            for hash in hashes {
                assert_eq!(&snapshot.records[hash].owner, owner);
            }
        }
    }

    #[test]
    fn duplicate_race_admits_exactly_one() {
        let registry = SharedRegistry::default();
        registry.set_authority("AUTH".into()).unwrap();

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let ctx = CallContext::new(format!("owner-{worker}"), 10);
                    registry
                        .register(LivestockRegistration::new("same", "Angus", 1, ""), &ctx)
                        .is_ok()
                })
            })
            .collect();

        let winners = workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(registry.get_count(), 1);
    }

    #[test]
    fn handle_exposes_registry_queries() {
        let registry = SharedRegistry::with_config(RegistryConfig {
            max_records_per_owner: 1,
            ..RegistryConfig::default()
        });
        assert!(registry.authority().is_none());
        registry.set_authority("AUTH".into()).unwrap();

        let ctx = CallContext::new("A", 10);
        registry
            .register(LivestockRegistration::new("h1", "Angus", 1, ""), &ctx)
            .unwrap();
        let err = registry
            .register(LivestockRegistration::new("h2", "Angus", 1, ""), &ctx)
            .unwrap_err();
        assert_eq!(err.code(), 107);

        registry.update_status(&"h1".into(), false, &ctx).unwrap();
        assert_eq!(
            registry.transfer(&"h1".into(), "B".into(), &ctx).unwrap_err().code(),
            105
        );
        assert!(registry.is_registered(&"h1".into()));
        assert!(!registry.get_record(&"h1".into()).unwrap().is_active);
        assert_eq!(registry.get_by_owner(&"A".into()), vec![RecordHash::new("h1")]);
        assert_eq!(registry.authority(), Some(Principal::new("AUTH")));
    }
}
