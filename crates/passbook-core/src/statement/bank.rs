//! Issuing bank identification from statement text.

use serde::{Deserialize, Serialize};

/// Code returned when no bank matches.
pub const UNKNOWN_BANK: &str = "unknown";

/// Display name for unmatched or unrecognised codes.
pub const UNKNOWN_BANK_NAME: &str = "Unknown Bank";

/// One bank: code, display name and identifying substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub code: String,
    pub display_name: String,
    /// Lower-case substrings searched in the document text.
    pub patterns: Vec<String>,
}

impl BankEntry {
    pub fn new(code: &str, display_name: &str, patterns: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered bank table; the first entry with a matching pattern wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankTable {
    pub entries: Vec<BankEntry>,
}

impl Default for BankTable {
    fn default() -> Self {
        Self {
            entries: vec![
                BankEntry::new("sbi", "State Bank of India", &["state bank of india", "sbi", "state bank"]),
                BankEntry::new("hdfc", "HDFC Bank", &["hdfc bank", "hdfc", "housing development finance"]),
                BankEntry::new("icici", "ICICI Bank", &["icici bank", "icici", "industrial credit"]),
                BankEntry::new("axis", "Axis Bank", &["axis bank", "axis"]),
                BankEntry::new("pnb", "Punjab National Bank", &["punjab national bank", "pnb"]),
                BankEntry::new("kotak", "Kotak Mahindra Bank", &["kotak mahindra bank", "kotak"]),
                BankEntry::new("indusind", "IndusInd Bank", &["indusind bank", "indusind"]),
                BankEntry::new("yes", "Yes Bank", &["yes bank", "yes"]),
                BankEntry::new("bob", "Bank of Baroda", &["bank of baroda", "baroda"]),
                BankEntry::new("canara", "Canara Bank", &["canara bank", "canara"]),
                BankEntry::new("union", "Union Bank of India", &["union bank", "union"]),
                BankEntry::new("indian", "Indian Bank", &["indian bank", "indian"]),
                BankEntry::new("central", "Central Bank of India", &["central bank", "central"]),
                BankEntry::new("idbi", "IDBI Bank", &["idbi bank", "idbi"]),
                BankEntry::new("idfc", "IDFC First Bank", &["idfc first bank", "idfc"]),
            ],
        }
    }
}

impl BankTable {
    /// Code of the first bank whose pattern occurs in `text`, or [`UNKNOWN_BANK`].
    pub fn identify(&self, text: &str) -> &str {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.patterns.iter().any(|p| lower.contains(p.as_str())))
            .map(|entry| entry.code.as_str())
            .unwrap_or(UNKNOWN_BANK)
    }

    /// Display name for a bank code.
    pub fn display_name(&self, code: &str) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.display_name.as_str())
            .unwrap_or(UNKNOWN_BANK_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_any_case() {
        let banks = BankTable::default();
        let code = banks.identify("Statement of account\nHdFc BaNk LTD, Mumbai");
        assert_eq!(code, "hdfc");
        assert_eq!(banks.display_name(code), "HDFC Bank");
    }

    #[test]
    fn test_table_order_wins() {
        let banks = BankTable::default();
        // "sbi" precedes "icici" in the table.
        assert_eq!(banks.identify("ICICI transfer to SBI account"), "sbi");
    }

    #[test]
    fn test_unknown_bank() {
        let banks = BankTable::default();
        assert_eq!(banks.identify("Acme Credit Union Ltd"), "union");
        assert_eq!(banks.identify("Acme Savings Ltd"), UNKNOWN_BANK);
        assert_eq!(banks.display_name(UNKNOWN_BANK), "Unknown Bank");
        assert_eq!(banks.display_name("nope"), "Unknown Bank");
    }
}
