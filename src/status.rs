use serde::{Deserialize, Serialize};

use crate::table::{NamespaceId, QuotaEntry, QuotaSubject, QuotaTableHandle, TableError};

/// One row of the observability surface: a tracked subject in the caller's
/// namespace with its last reported usage and configured limit. `None`
/// means no ceiling is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatusRow {
    pub subject: QuotaSubject,
    pub used_bytes: i64,
    pub limit_bytes: Option<i64>,
}

impl From<QuotaEntry> for QuotaStatusRow {
    fn from(entry: QuotaEntry) -> Self {
        let limit_bytes = if entry.is_unlimited() {
            None
        } else {
            Some(entry.limit_bytes)
        };
        Self {
            subject: entry.key.subject,
            used_bytes: entry.used_bytes,
            limit_bytes,
        }
    }
}

/// Read-only view over the shared table, scoped to one namespace. Does not
/// cache: every call reflects the table at that instant.
pub struct StatusReporter {
    table: QuotaTableHandle,
}

impl StatusReporter {
    pub fn new(table: QuotaTableHandle) -> Self {
        Self { table }
    }

    /// Every entry belonging to `namespace`, copied out at one instant and
    /// sorted for stable output. Entries of other namespaces sharing the
    /// table never appear.
    pub fn namespace_status(
        &self,
        namespace: NamespaceId,
    ) -> Result<Vec<QuotaStatusRow>, TableError> {
        let mut rows: Vec<QuotaStatusRow> = self
            .table
            .snapshot(|entry| entry.key.namespace == namespace)?
            .into_iter()
            .map(QuotaStatusRow::from)
            .collect();
        rows.sort_by_key(|row| sort_key(&row.subject));
        Ok(rows)
    }
}

fn sort_key(subject: &QuotaSubject) -> (u8, u32) {
    match subject {
        QuotaSubject::Object(id) => (0, *id),
        QuotaSubject::Principal(id) => (1, *id),
    }
}
