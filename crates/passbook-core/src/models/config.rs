//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::statement::bank::BankTable;
use crate::statement::rules::keywords::KeywordTables;

/// Main configuration for passbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PassbookConfig {
    /// PDF decoding configuration.
    pub pdf: PdfConfig,

    /// Transaction extraction configuration.
    pub extraction: ExtractionConfig,

    /// Keyword lists used by classification and inference.
    pub keywords: KeywordTables,

    /// Ordered bank identification table.
    pub banks: BankTable,
}

/// PDF decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Passphrase for encrypted statements.
    pub password: Option<String>,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Reconstruct tables from column-aligned page text.
    pub detect_layout_tables: bool,

    /// Minimum consecutive aligned lines forming a layout table.
    pub min_table_rows: usize,

    /// Minimum segments per line for a layout table row.
    pub min_table_columns: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            password: None,
            max_pages: 0,
            detect_layout_tables: true,
            min_table_rows: 2,
            min_table_columns: 3,
        }
    }
}

/// When free-text line extraction runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFallback {
    /// Only for pages whose tables produced no transaction.
    #[default]
    WhenTablesEmpty,
    /// For every page, alongside its tables.
    Always,
}

/// Slot order for amounts not placed by position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountFillOrder {
    /// Balance, then debit, then credit.
    #[default]
    BalanceFirst,
    /// Debit, then credit, then balance.
    DebitFirst,
}

/// Transaction extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// When the text-line fallback runs.
    pub text_fallback: TextFallback,

    /// Amount slot order for unpositioned amounts.
    pub amount_fill_order: AmountFillOrder,

    /// Rows sampled by content-based column inference.
    pub inference_sample_rows: usize,

    /// Text lines must be strictly longer than this to be considered.
    pub min_text_line_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            text_fallback: TextFallback::default(),
            amount_fill_order: AmountFillOrder::default(),
            inference_sample_rows: 10,
            min_text_line_length: 15,
        }
    }
}

impl PassbookConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PassbookConfig =
            serde_json::from_str(r#"{"extraction": {"text_fallback": "always"}}"#).unwrap();

        assert_eq!(config.extraction.text_fallback, TextFallback::Always);
        assert_eq!(config.extraction.amount_fill_order, AmountFillOrder::BalanceFirst);
        assert_eq!(config.extraction.inference_sample_rows, 10);
        assert_eq!(config.pdf.min_table_columns, 3);
        assert!(!config.banks.entries.is_empty());
        assert!(config.keywords.summary.contains(&"closing balance".to_string()));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PassbookConfig::default();
        config.extraction.amount_fill_order = AmountFillOrder::DebitFirst;
        config.pdf.password = Some("secret".to_string());
        config.save(&path).unwrap();

        let loaded = PassbookConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.amount_fill_order, AmountFillOrder::DebitFirst);
        assert_eq!(loaded.pdf.password.as_deref(), Some("secret"));
    }
}
