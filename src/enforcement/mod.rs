use thiserror::Error;

use crate::table::{NamespaceId, QuotaEntry, QuotaSubject};

mod checker;
mod hooks;
mod principal;
mod statement;

pub use checker::QuotaChecker;
pub use hooks::{
    install_quota_enforcement, EnforcementRegistry, ExtensionGuard, StatementGuard,
};
pub use principal::{PrincipalLookup, PrincipalLookupError};
pub use statement::{AccessMode, GrowthRequest, ObjectReference, ViolationMode, WriteStatement};

/// Registration name of the quota guards. Guard installation is idempotent
/// per name.
pub const QUOTA_GUARD_NAME: &str = "disk-quota";

/// Raised when a write would grow a subject that is already over its limit.
///
/// Aborts the whole enclosing statement; the writer must reduce usage or
/// raise the limit out-of-band before retrying, since the figures only move
/// when the external updater reports again.
#[derive(Debug, Error)]
pub enum EnforcementError {
    #[error("disk space quota exceeded for {subject:?} in namespace {namespace}: {used_bytes} of {limit_bytes} bytes used")]
    QuotaExceeded {
        subject: QuotaSubject,
        namespace: NamespaceId,
        used_bytes: i64,
        limit_bytes: i64,
    },
}

impl EnforcementError {
    pub(crate) fn quota_exceeded(entry: &QuotaEntry) -> Self {
        EnforcementError::QuotaExceeded {
            subject: entry.key.subject,
            namespace: entry.key.namespace,
            used_bytes: entry.used_bytes,
            limit_bytes: entry.limit_bytes,
        }
    }
}
