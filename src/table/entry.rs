use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a stored, quota-tracked object (e.g. a table).
pub type ObjectId = u32;

/// Opaque identifier of the logical grouping (e.g. a database) that scopes
/// object ids and entry visibility.
pub type NamespaceId = u32;

/// Opaque identifier of an owning identity (e.g. a role) an object is also
/// billed against.
pub type PrincipalId = u32;

/// The identity a quota entry bills usage to.
///
/// Quotas are two-level: an object carries its own limit, and its owning
/// principal can carry an independent one. Both levels live in the same
/// table under distinct subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum QuotaSubject {
    Object(ObjectId),
    Principal(PrincipalId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotaKey {
    pub subject: QuotaSubject,
    pub namespace: NamespaceId,
}

impl QuotaKey {
    pub fn object(object: ObjectId, namespace: NamespaceId) -> Self {
        Self {
            subject: QuotaSubject::Object(object),
            namespace,
        }
    }

    pub fn principal(principal: PrincipalId, namespace: NamespaceId) -> Self {
        Self {
            subject: QuotaSubject::Principal(principal),
            namespace,
        }
    }
}

/// Last reported usage and configured limit for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaEntry {
    pub key: QuotaKey,
    /// Last known total on-disk size, in bytes. Never negative.
    pub used_bytes: i64,
    /// Configured ceiling in bytes, or [`crate::table::UNLIMITED_BYTES`].
    pub limit_bytes: i64,
    /// Lease generation of the producer session that wrote the entry.
    pub generation: Uuid,
}

impl QuotaEntry {
    pub fn is_unlimited(&self) -> bool {
        self.limit_bytes < 0
    }

    /// Whether usage has surpassed the limit. The boundary is inclusive:
    /// usage exactly at the limit is still within quota.
    pub fn is_exceeded(&self) -> bool {
        !self.is_unlimited() && self.used_bytes > self.limit_bytes
    }

    pub fn remaining_bytes(&self) -> i64 {
        if self.is_unlimited() {
            i64::MAX
        } else {
            (self.limit_bytes - self.used_bytes).max(0)
        }
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.limit_bytes <= 0 {
            return 0.0;
        }
        (self.used_bytes as f64 / self.limit_bytes as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::UNLIMITED_BYTES;

    fn entry(used_bytes: i64, limit_bytes: i64) -> QuotaEntry {
        QuotaEntry {
            key: QuotaKey::object(1, 1),
            used_bytes,
            limit_bytes,
            generation: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_exceeded_boundary_is_inclusive() {
        assert!(!entry(1000, 1000).is_exceeded());
        assert!(entry(1001, 1000).is_exceeded());
    }

    #[test]
    fn test_unlimited_entry_never_exceeds() {
        let unlimited = entry(i64::MAX, UNLIMITED_BYTES);
        assert!(unlimited.is_unlimited());
        assert!(!unlimited.is_exceeded());
        assert_eq!(unlimited.remaining_bytes(), i64::MAX);
    }

    #[test]
    fn test_remaining_bytes_floors_at_zero() {
        assert_eq!(entry(400, 1000).remaining_bytes(), 600);
        assert_eq!(entry(1200, 1000).remaining_bytes(), 0);
    }

    #[test]
    fn test_usage_percentage() {
        assert_eq!(entry(500, 1000).usage_percentage(), 50.0);
        assert_eq!(entry(500, UNLIMITED_BYTES).usage_percentage(), 0.0);
    }
}
