use thiserror::Error;

use super::entry::NamespaceId;

#[derive(Debug, Error)]
pub enum TableError {
    /// The table is full and the key is not already tracked. Recoverable:
    /// the caller may evict entries, size the table up at the next restart,
    /// or skip the update.
    #[error("quota table full: all {capacity} slots in use, new key rejected")]
    CapacityExhausted { capacity: usize },
    #[error("used bytes must be non-negative, got {0}")]
    NegativeUsage(i64),
    #[error("limit must be non-negative or the unlimited sentinel, got {0}")]
    InvalidLimit(i64),
    #[error("quota lease for namespace {namespace} was superseded by a newer session")]
    StaleLease { namespace: NamespaceId },
    #[error("quota table lock poisoned by a crashed writer")]
    Poisoned,
}
