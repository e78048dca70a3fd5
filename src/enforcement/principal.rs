use thiserror::Error;

use crate::table::{NamespaceId, ObjectId, PrincipalId};

/// Resolves the owning principal of a storage object.
///
/// Implemented by the host engine's catalog. Lookup failure is not a quota
/// violation: the enforcement layer treats it as "no quota information" and
/// skips the principal level for that object.
pub trait PrincipalLookup: Send + Sync {
    fn owner_of(
        &self,
        object: ObjectId,
        namespace: NamespaceId,
    ) -> Result<PrincipalId, PrincipalLookupError>;
}

#[derive(Debug, Error)]
#[error("owner of object {object} in namespace {namespace} could not be resolved: {reason}")]
pub struct PrincipalLookupError {
    pub object: ObjectId,
    pub namespace: NamespaceId,
    pub reason: String,
}
