use uuid::Uuid;

use super::entry::{NamespaceId, ObjectId, PrincipalId, QuotaSubject};
use super::error::TableError;
use super::shared::QuotaTableHandle;

/// A producer session's write capability for one namespace.
///
/// Obtained from [`super::QuotaTable::attach`]. Each attach mints a new
/// generation token, and the table accepts upserts only from the latest
/// lease per namespace, so a producer that lost its slot cannot overwrite
/// fresher figures. Dropping the lease releases it if still current;
/// entries it wrote stay visible until the next attach cleans them up.
pub struct SessionLease {
    table: QuotaTableHandle,
    namespace: NamespaceId,
    generation: Uuid,
}

impl SessionLease {
    pub(super) fn new(table: QuotaTableHandle, namespace: NamespaceId, generation: Uuid) -> Self {
        Self {
            table,
            namespace,
            generation,
        }
    }

    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    pub fn generation(&self) -> Uuid {
        self.generation
    }

    /// Whether this lease is still the namespace's current producer.
    pub fn is_current(&self) -> bool {
        self.table.lease_is_current(self.namespace, self.generation)
    }

    /// Reports the authoritative usage and limit for an object, replacing
    /// any previous figures wholesale.
    pub fn upsert_object(
        &self,
        object: ObjectId,
        limit_bytes: i64,
        used_bytes: i64,
    ) -> Result<(), TableError> {
        self.table
            .upsert(self, QuotaSubject::Object(object), limit_bytes, used_bytes)
    }

    /// Same as [`Self::upsert_object`], for a principal-level entry.
    pub fn upsert_principal(
        &self,
        principal: PrincipalId,
        limit_bytes: i64,
        used_bytes: i64,
    ) -> Result<(), TableError> {
        self.table.upsert(
            self,
            QuotaSubject::Principal(principal),
            limit_bytes,
            used_bytes,
        )
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.table.release_lease(self.namespace, self.generation);
    }
}
