//! Configuration structures for the extraction pipeline.
//!
//! The heuristic constants below are tuning knobs, not derived values.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StmtxError};

/// Main configuration for stmtx.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Profile arbitration configuration.
    pub arbitration: ArbitrationConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters scanned for masked card numbers by the generic parser.
    pub card_scan_chars: usize,

    /// Characters scanned for period, due date and total labels.
    pub header_scan_chars: usize,

    /// Characters scanned by issuer-specific overrides.
    pub profile_scan_chars: usize,

    /// Characters scanned for issuer identity keywords.
    pub detection_scan_chars: usize,

    /// Days after the period end used as a due date when none is printed.
    pub due_date_offset_days: i64,

    /// Label-proximity totals at or above this are treated as inflated.
    #[serde(with = "rust_decimal::serde::float")]
    pub inflated_total_threshold: Decimal,

    /// Label-proximity totals exceeding the computed total by more than this
    /// lose to the computed total.
    #[serde(with = "rust_decimal::serde::float")]
    pub computed_total_divergence: Decimal,

    /// A period derived from transactions must span more than this many days.
    pub min_derived_period_days: i64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            card_scan_chars: 8_000,
            header_scan_chars: 4_000,
            profile_scan_chars: 20_000,
            detection_scan_chars: 8_000,
            due_date_offset_days: 20,
            inflated_total_threshold: Decimal::new(2_000, 0),
            computed_total_divergence: Decimal::new(500, 0),
            min_derived_period_days: 10,
        }
    }
}

/// Profile arbitration configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    /// A preferred issuer within this many points of the best score wins.
    pub preference_tolerance: u32,

    /// Transactions beyond this count add nothing to the completeness score.
    pub max_scored_transactions: u32,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            preference_tolerance: 2,
            max_scored_transactions: 15,
        }
    }
}

impl StmtxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StmtxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| StmtxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StmtxConfig =
            serde_json::from_str(r#"{ "arbitration": { "preference_tolerance": 5 } }"#).unwrap();
        assert_eq!(config.arbitration.preference_tolerance, 5);
        assert_eq!(config.arbitration.max_scored_transactions, 15);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StmtxConfig::default();
        config.extraction.due_date_offset_days = 18;
        config.extraction.inflated_total_threshold = Decimal::new(2500, 0);
        config.save(&path).unwrap();

        let loaded = StmtxConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = StmtxConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, StmtxError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StmtxConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StmtxError::Io(_)));
    }
}
