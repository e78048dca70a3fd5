use tracing::warn;

use crate::table::{QuotaEntry, QuotaKey, QuotaTableHandle};

/// Stateless admission predicate over the shared table.
///
/// Missing data never blocks a write: a checker with no table yet, a key
/// with no entry, an unlimited entry, and an unreadable table all answer
/// "allowed". Only an entry whose usage is strictly above its limit denies;
/// usage exactly at the limit is still within quota.
#[derive(Clone)]
pub struct QuotaChecker {
    table: Option<QuotaTableHandle>,
}

impl QuotaChecker {
    pub fn new(table: QuotaTableHandle) -> Self {
        Self { table: Some(table) }
    }

    /// Checker for the window before the shared table has been constructed.
    /// Allows everything.
    pub fn detached() -> Self {
        Self { table: None }
    }

    /// `true` if the quota for `key` has not been exceeded yet.
    pub fn check(&self, key: &QuotaKey) -> bool {
        self.violation(key).is_none()
    }

    /// The violating entry for `key`, if its quota has been exceeded.
    pub fn violation(&self, key: &QuotaKey) -> Option<QuotaEntry> {
        let table = self.table.as_ref()?;
        let entry = match table.lookup(key) {
            Ok(found) => found?,
            Err(err) => {
                warn!(error = %err, "quota table unreadable, allowing write");
                return None;
            }
        };
        entry.is_exceeded().then_some(entry)
    }
}
