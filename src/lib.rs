//! Per-relation disk-space quota admission control.
//!
//! This crate is the enforcement core of a disk quota system for a
//! multi-process database server: a shared usage/quota table, the
//! admission-control predicate built on it, and the two write-path
//! interception points that consult the predicate before a stored object is
//! allowed to grow on disk.
//!
//! Usage and limit figures are produced elsewhere (a background process
//! that scans the filesystem and reads the quota configuration) and fed in
//! through [`SessionLease::upsert_object`] / [`SessionLease::upsert_principal`].
//! The core never measures disk usage itself and never persists anything:
//! the table lives for the server's lifetime only and is rebuilt from
//! scratch by the updater after a restart.
//!
//! Quotas are two-level. Every write is admitted only if both the object's
//! own quota and its owning principal's quota (when the owner resolves) have
//! headroom. Missing data always fails open: an untracked object, an
//! unlimited entry, or an unresolvable owner never blocks a write.

pub mod config;
pub mod enforcement;
pub mod status;
pub mod table;

pub use config::QuotaConfig;
pub use enforcement::{
    install_quota_enforcement, AccessMode, EnforcementError, EnforcementRegistry, ExtensionGuard,
    GrowthRequest, ObjectReference, PrincipalLookup, PrincipalLookupError, QuotaChecker,
    StatementGuard, ViolationMode, WriteStatement, QUOTA_GUARD_NAME,
};
pub use status::{QuotaStatusRow, StatusReporter};
pub use table::{
    NamespaceId, ObjectId, PrincipalId, QuotaEntry, QuotaKey, QuotaSubject, QuotaTable,
    QuotaTableHandle, SessionLease, TableError, DEFAULT_TABLE_CAPACITY, UNLIMITED_BYTES,
};
