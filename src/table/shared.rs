use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::QuotaConfig;

use super::entry::{NamespaceId, QuotaEntry, QuotaKey, QuotaSubject};
use super::error::TableError;
use super::lease::SessionLease;
use super::UNLIMITED_BYTES;

/// Shared handle to the table. Constructed once at server start and passed
/// explicitly to every consumer; the table is never reachable through a
/// process-wide global.
pub type QuotaTableHandle = Arc<QuotaTable>;

struct TableState {
    entries: HashMap<QuotaKey, QuotaEntry>,
    /// Current producer lease generation per namespace. A lease carrying a
    /// different generation has been superseded and may no longer write.
    leases: HashMap<NamespaceId, Uuid>,
}

/// Fixed-capacity usage/quota table shared by every session in the server.
///
/// One table-wide reader/writer lock protects all entries: point reads and
/// snapshots take the shared mode, upserts and bulk removals the exclusive
/// mode. The lock is held only for the in-memory operation itself, never
/// across error reporting or I/O. Capacity is fixed at construction; a new
/// key beyond it is rejected with [`TableError::CapacityExhausted`], never
/// evicted around.
pub struct QuotaTable {
    state: RwLock<TableState>,
    capacity: usize,
}

impl QuotaTable {
    pub fn new(capacity: usize) -> QuotaTableHandle {
        Arc::new(Self {
            state: RwLock::new(TableState {
                entries: HashMap::with_capacity(capacity),
                leases: HashMap::new(),
            }),
            capacity,
        })
    }

    pub fn with_config(config: &QuotaConfig) -> QuotaTableHandle {
        Self::new(config.table_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently tracked, across all namespaces.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|state| state.entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches a producer session to `namespace` and returns its lease.
    ///
    /// Installs a fresh generation token for the namespace and removes every
    /// entry left behind by earlier generations, so figures from a crashed
    /// or superseded producer never linger. Any previously issued lease for
    /// the same namespace is fenced out: its later upserts fail with
    /// [`TableError::StaleLease`]. Concurrent attaches serialize on the
    /// exclusive lock; the later one wins.
    pub fn attach(self: &Arc<Self>, namespace: NamespaceId) -> Result<SessionLease, TableError> {
        let generation = Uuid::new_v4();
        let removed = {
            let mut state = self.state.write().map_err(|_| TableError::Poisoned)?;
            state.leases.insert(namespace, generation);
            let before = state.entries.len();
            state
                .entries
                .retain(|key, entry| key.namespace != namespace || entry.generation == generation);
            before - state.entries.len()
        };
        info!(namespace, %generation, removed, "quota session attached");
        Ok(SessionLease::new(Arc::clone(self), namespace, generation))
    }

    /// Creates or wholesale-replaces the entry for `(subject, namespace)`.
    /// Figures are authoritative, not merged with previous ones.
    pub fn upsert(
        &self,
        lease: &SessionLease,
        subject: QuotaSubject,
        limit_bytes: i64,
        used_bytes: i64,
    ) -> Result<(), TableError> {
        if used_bytes < 0 {
            return Err(TableError::NegativeUsage(used_bytes));
        }
        if limit_bytes < 0 && limit_bytes != UNLIMITED_BYTES {
            return Err(TableError::InvalidLimit(limit_bytes));
        }

        let key = QuotaKey {
            subject,
            namespace: lease.namespace(),
        };
        let mut state = self.state.write().map_err(|_| TableError::Poisoned)?;

        if state.leases.get(&lease.namespace()).copied() != Some(lease.generation()) {
            return Err(TableError::StaleLease {
                namespace: lease.namespace(),
            });
        }
        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            return Err(TableError::CapacityExhausted {
                capacity: self.capacity,
            });
        }

        state.entries.insert(
            key,
            QuotaEntry {
                key,
                used_bytes,
                limit_bytes,
                generation: lease.generation(),
            },
        );
        Ok(())
    }

    /// Point read. The entry is copied out; nothing is borrowed past the
    /// lock.
    pub fn lookup(&self, key: &QuotaKey) -> Result<Option<QuotaEntry>, TableError> {
        let state = self.state.read().map_err(|_| TableError::Poisoned)?;
        Ok(state.entries.get(key).cloned())
    }

    /// Deletes every entry satisfying `predicate`; returns how many were
    /// removed.
    pub fn remove_matching<F>(&self, predicate: F) -> Result<usize, TableError>
    where
        F: Fn(&QuotaEntry) -> bool,
    {
        let removed = {
            let mut state = self.state.write().map_err(|_| TableError::Poisoned)?;
            let before = state.entries.len();
            state.entries.retain(|_, entry| !predicate(entry));
            before - state.entries.len()
        };
        if removed > 0 {
            debug!(removed, "bulk-removed quota entries");
        }
        Ok(removed)
    }

    /// Copies out every entry satisfying `predicate` at a single consistent
    /// instant; a concurrent writer cannot interleave half-applied entries
    /// into the result.
    pub fn snapshot<F>(&self, predicate: F) -> Result<Vec<QuotaEntry>, TableError>
    where
        F: Fn(&QuotaEntry) -> bool,
    {
        let state = self.state.read().map_err(|_| TableError::Poisoned)?;
        Ok(state
            .entries
            .values()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect())
    }

    pub(super) fn lease_is_current(&self, namespace: NamespaceId, generation: Uuid) -> bool {
        self.state
            .read()
            .map(|state| state.leases.get(&namespace).copied() == Some(generation))
            .unwrap_or(false)
    }

    /// Best-effort removal of a released lease; never panics in drop.
    pub(super) fn release_lease(&self, namespace: NamespaceId, generation: Uuid) {
        let released = match self.state.write() {
            Ok(mut state) => {
                if state.leases.get(&namespace).copied() == Some(generation) {
                    state.leases.remove(&namespace);
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };
        if released {
            debug!(namespace, %generation, "quota lease released");
        }
    }
}
