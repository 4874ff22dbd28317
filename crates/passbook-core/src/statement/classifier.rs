//! Row classification: headers, charge tables, invalid rows and summaries.

use tracing::trace;

use super::rules::{contains_any, count_matches, is_any_date, is_date, is_period, KeywordTables};

/// What a raw row turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// Header of a fee/charge table.
    ChargeHeader,
    /// Header of a transaction table.
    TransactionHeader,
    /// Structurally not a transaction.
    Invalid,
    /// Candidate transaction row.
    Data,
}

impl RowClass {
    pub fn is_data(&self) -> bool {
        matches!(self, RowClass::Data)
    }
}

/// Join trimmed, non-empty cells into one lower-cased string.
pub fn join_row(row: &[Option<String>]) -> String {
    row.iter()
        .filter_map(|cell| cell.as_deref())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn cell(row: &[Option<String>], index: usize) -> &str {
    row.get(index)
        .and_then(|c| c.as_deref())
        .map(str::trim)
        .unwrap_or("")
}

/// Keyword-driven row classifier.
pub struct RowClassifier<'a> {
    keywords: &'a KeywordTables,
}

impl<'a> RowClassifier<'a> {
    pub fn new(keywords: &'a KeywordTables) -> Self {
        Self { keywords }
    }

    /// Apply the header, charge and validity checks in order.
    pub fn classify(&self, row: &[Option<String>]) -> RowClass {
        let class = if self.is_charge_header(row) {
            RowClass::ChargeHeader
        } else if self.is_transaction_header(row) {
            RowClass::TransactionHeader
        } else if self.is_invalid_row(row) {
            RowClass::Invalid
        } else {
            RowClass::Data
        };
        if !class.is_data() {
            trace!("Row classified as {:?}: {:?}", class, row);
        }
        class
    }

    /// Two or more charge-table header keywords in a row of at least three cells.
    pub fn is_charge_header(&self, row: &[Option<String>]) -> bool {
        row.len() >= 3 && count_matches(&join_row(row), &self.keywords.charge_header) >= 2
    }

    /// Three or more transaction-table header keywords in a row of at least three cells.
    pub fn is_transaction_header(&self, row: &[Option<String>]) -> bool {
        row.len() >= 3 && count_matches(&join_row(row), &self.keywords.transaction_header) >= 3
    }

    /// Rows that can never hold a transaction.
    pub fn is_invalid_row(&self, row: &[Option<String>]) -> bool {
        if row.is_empty() {
            return true;
        }

        let text = join_row(row);
        if contains_any(&text, &self.keywords.invalid_row) {
            return true;
        }

        // Echoed column headers
        if text.contains("date") && text.contains("transaction") && text.contains("details") {
            return true;
        }
        if text.contains("tran date") && text.contains("particulars") {
            return true;
        }

        let first = cell(row, 0);
        if is_any_date(first) {
            return false;
        }

        if row.len() >= 2 {
            let serial = first.chars().all(|c| c.is_ascii_digit())
                && first.parse::<u32>().is_ok_and(|n| (1..=99).contains(&n));
            if serial && is_date(cell(row, 1)) {
                return true;
            }
            if is_period(first) {
                return true;
            }
        }

        false
    }

    /// Totals, carried-forward balances, fees and fragments.
    pub fn is_summary(&self, description: &str) -> bool {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return false;
        }

        let lower = description.to_lowercase();
        if contains_any(&lower, &self.keywords.summary) || contains_any(&lower, &self.keywords.fee) {
            return true;
        }

        if trimmed.chars().count() <= 2 {
            return true;
        }
        if trimmed.len() <= 3 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }

        is_period(trimmed)
    }
}
