use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::config::QuotaConfig;
use crate::table::{NamespaceId, ObjectId, QuotaEntry, QuotaKey, QuotaTableHandle};

use super::checker::QuotaChecker;
use super::principal::PrincipalLookup;
use super::statement::{AccessMode, GrowthRequest, ViolationMode, WriteStatement};
use super::{EnforcementError, QUOTA_GUARD_NAME};

/// Interceptor on the statement-level write path.
pub trait StatementGuard: Send + Sync {
    /// Registration name; a chain never holds two guards with the same name.
    fn name(&self) -> &str;

    /// `Ok(true)` lets the statement proceed. On violation the guard raises
    /// in [`ViolationMode::Raise`] and returns `Ok(false)` in
    /// [`ViolationMode::Probe`].
    fn authorize_statement(
        &self,
        statement: &WriteStatement,
        mode: ViolationMode,
    ) -> Result<bool, EnforcementError>;
}

/// Interceptor on the storage-extension write path.
pub trait ExtensionGuard: Send + Sync {
    fn name(&self) -> &str;

    /// Errors to abort the write that asked for one more allocation unit.
    fn authorize_growth(&self, request: &GrowthRequest) -> Result<(), EnforcementError>;
}

/// The host engine's two write-path interception points.
///
/// Each point is an explicit ordered chain. Registration prepends, so the
/// newest guard runs first, and every guard present before it keeps its
/// place and keeps being invoked: dispatch walks the whole chain unless a
/// guard denies.
#[derive(Default)]
pub struct EnforcementRegistry {
    statement_guards: RwLock<Vec<Arc<dyn StatementGuard>>>,
    extension_guards: RwLock<Vec<Arc<dyn ExtensionGuard>>>,
}

impl EnforcementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `guard` ahead of the existing chain. No-op when a guard
    /// with the same name is already installed; returns whether it was
    /// added.
    pub fn register_statement_guard(&self, guard: Arc<dyn StatementGuard>) -> bool {
        let mut chain = match self.statement_guards.write() {
            Ok(chain) => chain,
            Err(_) => {
                warn!(guard = guard.name(), "statement chain poisoned, guard not registered");
                return false;
            }
        };
        if chain.iter().any(|existing| existing.name() == guard.name()) {
            return false;
        }
        chain.insert(0, guard);
        true
    }

    pub fn register_extension_guard(&self, guard: Arc<dyn ExtensionGuard>) -> bool {
        let mut chain = match self.extension_guards.write() {
            Ok(chain) => chain,
            Err(_) => {
                warn!(guard = guard.name(), "extension chain poisoned, guard not registered");
                return false;
            }
        };
        if chain.iter().any(|existing| existing.name() == guard.name()) {
            return false;
        }
        chain.insert(0, guard);
        true
    }

    /// Statement-level interception point, called once per write-requiring
    /// statement. Consults every guard in order; the first denial wins and
    /// the rest of the chain is skipped.
    pub fn authorize_statement(
        &self,
        statement: &WriteStatement,
        mode: ViolationMode,
    ) -> Result<bool, EnforcementError> {
        let chain: Vec<Arc<dyn StatementGuard>> = match self.statement_guards.read() {
            Ok(guards) => guards.clone(),
            Err(_) => {
                warn!("statement chain poisoned, allowing statement");
                return Ok(true);
            }
        };
        for guard in &chain {
            if !guard.authorize_statement(statement, mode)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Storage-extension interception point, called once per physical
    /// growth request.
    pub fn authorize_growth(&self, request: &GrowthRequest) -> Result<(), EnforcementError> {
        let chain: Vec<Arc<dyn ExtensionGuard>> = match self.extension_guards.read() {
            Ok(guards) => guards.clone(),
            Err(_) => {
                warn!("extension chain poisoned, allowing growth");
                return Ok(());
            }
        };
        for guard in &chain {
            guard.authorize_growth(request)?;
        }
        Ok(())
    }

    /// Installed statement guards, chain order.
    pub fn statement_guard_names(&self) -> Vec<String> {
        self.statement_guards
            .read()
            .map(|chain| chain.iter().map(|guard| guard.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Installed extension guards, chain order.
    pub fn extension_guard_names(&self) -> Vec<String> {
        self.extension_guards
            .read()
            .map(|chain| chain.iter().map(|guard| guard.name().to_string()).collect())
            .unwrap_or_default()
    }
}

/// Both quota guards share the two-level lookup: the object's own quota
/// first, then the owning principal's when the owner resolves. Resolution
/// failure skips the principal level; missing data allows the write.
struct QuotaLevels {
    checker: QuotaChecker,
    principals: Arc<dyn PrincipalLookup>,
}

impl QuotaLevels {
    fn violation(&self, object: ObjectId, namespace: NamespaceId) -> Option<QuotaEntry> {
        if let Some(entry) = self.checker.violation(&QuotaKey::object(object, namespace)) {
            return Some(entry);
        }
        match self.principals.owner_of(object, namespace) {
            Ok(principal) => self
                .checker
                .violation(&QuotaKey::principal(principal, namespace)),
            Err(err) => {
                debug!(error = %err, "owner unresolved, principal-level quota skipped");
                None
            }
        }
    }
}

struct QuotaStatementGuard {
    levels: QuotaLevels,
}

impl StatementGuard for QuotaStatementGuard {
    fn name(&self) -> &str {
        QUOTA_GUARD_NAME
    }

    fn authorize_statement(
        &self,
        statement: &WriteStatement,
        mode: ViolationMode,
    ) -> Result<bool, EnforcementError> {
        for reference in &statement.references {
            // Only storage growth is quota-relevant; reads and in-place
            // updates pass.
            if !reference.requires(AccessMode::Insert) {
                continue;
            }
            if let Some(entry) = self.levels.violation(reference.object, statement.namespace) {
                warn!(
                    object = reference.object,
                    namespace = statement.namespace,
                    "statement denied, disk quota exceeded"
                );
                return match mode {
                    ViolationMode::Raise => Err(EnforcementError::quota_exceeded(&entry)),
                    ViolationMode::Probe => Ok(false),
                };
            }
        }
        Ok(true)
    }
}

struct QuotaExtensionGuard {
    levels: QuotaLevels,
}

impl ExtensionGuard for QuotaExtensionGuard {
    fn name(&self) -> &str {
        QUOTA_GUARD_NAME
    }

    fn authorize_growth(&self, request: &GrowthRequest) -> Result<(), EnforcementError> {
        if let Some(entry) = self.levels.violation(request.object, request.namespace) {
            warn!(
                object = request.object,
                namespace = request.namespace,
                "growth denied, disk quota exceeded"
            );
            return Err(EnforcementError::quota_exceeded(&entry));
        }
        Ok(())
    }
}

/// Installs the quota guards at both interception points, subject to the
/// config toggles.
///
/// Idempotent: a second call leaves the chains unchanged. The quota guards
/// are registered ahead of any previously installed interceptor (fast-fail
/// order); earlier interceptors keep running whenever no guard before them
/// denies.
pub fn install_quota_enforcement(
    registry: &EnforcementRegistry,
    config: &QuotaConfig,
    table: QuotaTableHandle,
    principals: Arc<dyn PrincipalLookup>,
) {
    let checker = QuotaChecker::new(table);
    let mut installed = false;

    if config.statement_checks {
        installed |= registry.register_statement_guard(Arc::new(QuotaStatementGuard {
            levels: QuotaLevels {
                checker: checker.clone(),
                principals: Arc::clone(&principals),
            },
        }));
    }
    if config.extension_checks {
        installed |= registry.register_extension_guard(Arc::new(QuotaExtensionGuard {
            levels: QuotaLevels {
                checker,
                principals,
            },
        }));
    }
    if installed {
        debug!("disk quota enforcement guards installed");
    }
}
