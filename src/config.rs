use std::env;

use anyhow::{Context, Result};

use crate::table::DEFAULT_TABLE_CAPACITY;

/// Runtime configuration for the quota core.
///
/// All values come from the environment so the host server can tune the
/// core without recompiling. The table capacity is fixed once the table is
/// constructed; the two check toggles decide which write-path guards
/// [`crate::install_quota_enforcement`] registers.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub table_capacity: usize,
    pub statement_checks: bool,
    pub extension_checks: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            table_capacity: DEFAULT_TABLE_CAPACITY,
            statement_checks: true,
            extension_checks: true,
        }
    }
}

impl QuotaConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(capacity) = env::var("RELQUOTA_TABLE_CAPACITY") {
            cfg.table_capacity = capacity
                .parse()
                .context("RELQUOTA_TABLE_CAPACITY must be a positive integer")?;
        }
        if let Ok(flag) = env::var("RELQUOTA_STATEMENT_CHECKS") {
            cfg.statement_checks = parse_bool(&flag)
                .with_context(|| format!("RELQUOTA_STATEMENT_CHECKS is invalid: {flag}"))?;
        }
        if let Ok(flag) = env::var("RELQUOTA_EXTENSION_CHECKS") {
            cfg.extension_checks = parse_bool(&flag)
                .with_context(|| format!("RELQUOTA_EXTENSION_CHECKS is invalid: {flag}"))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_capacity == 0 {
            anyhow::bail!("RELQUOTA_TABLE_CAPACITY must be greater than zero");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => anyhow::bail!("invalid boolean value {value}"),
    }
}
