pub mod entry;
pub mod error;
pub mod lease;
pub mod shared;

pub use entry::{NamespaceId, ObjectId, PrincipalId, QuotaEntry, QuotaKey, QuotaSubject};
pub use error::TableError;
pub use lease::SessionLease;
pub use shared::{QuotaTable, QuotaTableHandle};

/// Reserved limit value meaning "no quota configured".
pub const UNLIMITED_BYTES: i64 = -1;

/// Default number of entries the shared table is sized for.
pub const DEFAULT_TABLE_CAPACITY: usize = 1024;
