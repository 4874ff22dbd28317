//! Keyword tables driving row classification and column inference.
//!
//! All entries are lower-case substrings matched against lower-cased text.

use serde::{Deserialize, Serialize};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every keyword list used by the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    /// Headers of fee/charge tables (2+ hits skips the row).
    pub charge_header: Vec<String>,

    /// Headers of transaction tables (3+ hits skips the row).
    pub transaction_header: Vec<String>,

    /// Any hit marks a row as structurally invalid.
    pub invalid_row: Vec<String>,

    /// Totals and carried-forward balances.
    pub summary: Vec<String>,

    /// Fee and charge narrations that are never transactions.
    pub fee: Vec<String>,

    /// Header indicators for the date column.
    pub date_header: Vec<String>,

    /// Header indicators for any amount column.
    pub amount_header: Vec<String>,

    /// Header indicators for the description column.
    pub description_header: Vec<String>,

    pub debit: Vec<String>,
    pub credit: Vec<String>,
    pub balance: Vec<String>,
    pub reference: Vec<String>,
    pub branch: Vec<String>,

    /// Narration words implying money in, used by the text-line extractor.
    pub credit_hints: Vec<String>,

    /// Prefixes of transfer references such as `UPI-` (case-sensitive).
    pub transfer_markers: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            charge_header: strings(&[
                "sr. no",
                "sr.no",
                "period",
                "recover date",
                "charge type",
                "charges(rs)",
                "total(rs)",
                "service charges",
                "fees summary",
                "transaction charges",
            ]),
            transaction_header: strings(&[
                "tran date",
                "transaction date",
                "particulars",
                "debit",
                "credit",
                "balance",
                "init.br",
                "chq no",
                "check no",
                "reference",
                "description",
            ]),
            invalid_row: strings(&[
                "charge type",
                "charges(rs)",
                "total(rs)",
                "rtgs fee",
                "cash transaction fee",
                "service charge",
                "processing fee",
                "recover date",
                "sr. no",
                "sr.no",
                "period",
                "chargeable amount",
                "net chargeable",
            ]),
            summary: strings(&[
                "transaction total",
                "opening balance",
                "closing balance",
                "total debit",
                "total credit",
                "net amount",
                "balance b/f",
                "balance c/f",
                "brought forward",
                "carried forward",
                "subtotal",
                "grand total",
                "summary",
                "total amount",
            ]),
            fee: strings(&[
                "charge type",
                "charges(rs)",
                "total(rs)",
                "rtgs fee",
                "cash transaction fee",
                "service charge",
                "processing fee",
                "annual fee",
                "maintenance fee",
                "sms charges",
                "atm charges",
                "debit card charges",
                "cheque book charges",
                "recover date",
                "period",
                "sr. no",
                "sr.no",
                "chargeable amount",
                "net chargeable",
                "charges indicate",
            ]),
            date_header: strings(&["date", "tran date", "transaction date", "txn date"]),
            amount_header: strings(&[
                "debit",
                "credit",
                "balance",
                "amount",
                "withdrawal",
                "deposit",
            ]),
            description_header: strings(&[
                "particulars",
                "description",
                "details",
                "transaction details",
                "narration",
            ]),
            debit: strings(&["debit", "withdrawal"]),
            credit: strings(&["credit", "deposit"]),
            balance: strings(&["balance"]),
            reference: strings(&["reference", "ref", "chq", "cheque"]),
            branch: strings(&["init.br", "branch"]),
            credit_hints: strings(&[
                "credit", "deposit", "salary", "interest", "refund", "cashback",
            ]),
            transfer_markers: strings(&["UPI-"]),
        }
    }
}

/// Number of keywords that occur in `text`.
pub fn count_matches(text: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

/// True if any keyword occurs in `text`.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_matches() {
        let tables = KeywordTables::default();
        let text = "sr. no period recover date amount";
        assert_eq!(count_matches(text, &tables.charge_header), 3);
        assert_eq!(count_matches("nothing here", &tables.charge_header), 0);
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let tables: KeywordTables =
            serde_json::from_str(r#"{"transfer_markers": ["UPI-", "NEFT-"]}"#).unwrap();
        assert_eq!(tables.transfer_markers.len(), 2);
        assert!(contains_any("closing balance", &tables.summary));
    }
}
