//! Configuration for the QC pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunables for the validation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    /// Allowed absolute deviation between net + tax and the total due
    /// before the reconciliation warning fires (inclusive boundary).
    pub amount_tolerance: Decimal,

    /// Invoices dated strictly more than this many days before the
    /// validation timestamp are flagged as stale.
    pub max_invoice_age_days: i64,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            // 0.05 currency units
            amount_tolerance: Decimal::new(5, 2),
            max_invoice_age_days: 365,
        }
    }
}

impl QcConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
