//! Statement data models: decoded pages, column roles, transactions and outcomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ExtractionError};

/// One raw table row: ordered optional text cells.
pub type RawRow = Vec<Option<String>>;

/// A table as produced by the decoding collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    /// Rows in page order.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from rows.
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Build a table from string cells, treating empty strings as present-but-blank.
    pub fn from_cells<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Content decoded from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted page text (may be empty).
    #[serde(default)]
    pub text: String,
    /// Tables found on this page.
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

impl PageContent {
    /// Create a page with text only.
    pub fn from_text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            tables: Vec::new(),
        }
    }

    /// True when the page has neither usable text nor any table row.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.iter().all(RawTable::is_empty)
    }
}

/// Semantic role of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Date,
    Description,
    Debit,
    Credit,
    Balance,
    Reference,
    /// Initiating branch code; only bound from header keywords.
    BranchCode,
}

impl Role {
    /// Priority used when matching header cells.
    pub const HEADER_PRIORITY: [Role; 7] = [
        Role::Date,
        Role::Debit,
        Role::Credit,
        Role::Balance,
        Role::Description,
        Role::Reference,
        Role::BranchCode,
    ];
}

/// Binding of roles to column indices for one table.
///
/// Built through [`MappingBuilder`]; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    bindings: Vec<(Role, usize)>,
}

impl ColumnMapping {
    /// Column bound to `role`, if any.
    pub fn get(&self, role: Role) -> Option<usize> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == role)
            .map(|(_, column)| *column)
    }

    /// Bindings in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        self.bindings.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

/// Monotonic, first-match-wins accumulator for a [`ColumnMapping`].
#[derive(Debug, Default)]
pub struct MappingBuilder {
    bindings: Vec<(Role, usize)>,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, role: Role) -> bool {
        self.bindings.iter().any(|(bound, _)| *bound == role)
    }

    pub fn is_claimed(&self, column: usize) -> bool {
        self.bindings.iter().any(|(_, bound)| *bound == column)
    }

    /// Bind `role` to `column` unless either is already taken.
    pub fn bind(&mut self, role: Role, column: usize) -> bool {
        if self.is_bound(role) || self.is_claimed(column) {
            return false;
        }
        self.bindings.push((role, column));
        true
    }

    pub fn build(self) -> ColumnMapping {
        ColumnMapping {
            bindings: self.bindings,
        }
    }
}

/// A validated statement transaction.
///
/// Amounts are non-negative magnitudes; direction is carried by the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Canonical `DD-MM-YYYY`, the original text when unparseable, or empty.
    pub date: String,

    /// Narration; never empty.
    pub description: String,

    /// Money out.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub debit: Option<Decimal>,

    /// Money in.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub credit: Option<Decimal>,

    /// Running balance after the transaction.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,

    /// Cheque number or transfer reference.
    #[serde(default)]
    pub reference: String,

    /// Initiating branch code.
    #[serde(default)]
    pub branch_code: String,
}

/// First and last transaction dates of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// A row or line that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWarning {
    /// Always [`ErrorKind::RowParseError`].
    pub kind: ErrorKind,
    pub page: u32,
    /// Row index within its table.
    pub row: usize,
    pub reason: String,
}

impl RowWarning {
    pub fn new(page: u32, row: usize, reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RowParseError,
            page,
            row,
            reason: reason.into(),
        }
    }
}

/// Final result of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    /// Whether at least one transaction was extracted.
    pub success: bool,

    /// Transactions ordered ascending by date.
    pub transactions: Vec<Transaction>,

    /// Detected bank code (`"unknown"` when no bank matched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,

    /// Display name for the detected bank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_display_name: Option<String>,

    /// Statement date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    /// Failure tag, only set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,

    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Rows skipped as unparseable; never fails the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RowWarning>,
}

impl ProcessingOutcome {
    /// A failed outcome with the default message for `kind`.
    pub fn failure(kind: ErrorKind, bank_code: Option<String>) -> Self {
        Self::failure_with_message(kind, bank_code, kind.message())
    }

    /// A failed outcome with a custom message.
    pub fn failure_with_message(
        kind: ErrorKind,
        bank_code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            transactions: Vec::new(),
            bank_code,
            bank_display_name: None,
            date_range: None,
            error_kind: Some(kind),
            error_message: Some(message.into()),
            warnings: Vec::new(),
        }
    }

    /// Transactions of a successful outcome.
    pub fn require_transactions(&self) -> Result<&[Transaction], ExtractionError> {
        if self.success {
            Ok(&self.transactions)
        } else {
            Err(ExtractionError::NoData)
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Bank display name, falling back to `"Unknown Bank"`.
    pub fn bank_name(&self) -> &str {
        self.bank_display_name.as_deref().unwrap_or("Unknown Bank")
    }

    /// Summary record consumed by status polling.
    pub fn status(&self) -> StatusRecord {
        StatusRecord {
            bank_name: self.bank_display_name.clone(),
            transaction_count: self.transaction_count(),
            date_range: self.date_range.clone(),
            error_message: self.error_message.clone(),
            error_kind: self.error_kind,
        }
    }

    /// Ordered transaction listing.
    pub fn listing(&self) -> TransactionListing {
        TransactionListing {
            transactions: self.transactions.clone(),
            bank_name: self.bank_name().to_string(),
            total_transactions: self.transaction_count(),
            date_range: self.date_range.clone(),
        }
    }
}

/// Status summary of one processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub bank_name: Option<String>,
    pub transaction_count: usize,
    pub date_range: Option<DateRange>,
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// Transactions plus the header fields shown alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListing {
    pub transactions: Vec<Transaction>,
    pub bank_name: String,
    pub total_transactions: usize,
    pub date_range: Option<DateRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mapping_builder_is_monotonic() {
        let mut builder = MappingBuilder::new();
        assert!(builder.bind(Role::Date, 0));
        assert!(!builder.bind(Role::Date, 1));
        assert!(!builder.bind(Role::Debit, 0));
        assert!(builder.bind(Role::Debit, 3));

        let mapping = builder.build();
        assert_eq!(mapping.get(Role::Date), Some(0));
        assert_eq!(mapping.get(Role::Debit), Some(3));
        assert_eq!(mapping.get(Role::Credit), None);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_raw_table_json_shape() {
        let table: RawTable =
            serde_json::from_str(r#"[["01-06-2025", null, "Salary"]]"#).unwrap();
        assert_eq!(table.rows[0][1], None);
        assert_eq!(table.rows[0][2].as_deref(), Some("Salary"));
    }

    #[test]
    fn test_page_is_empty() {
        assert!(PageContent::from_text(1, "   \n ").is_empty());
        assert!(!PageContent::from_text(1, "HDFC BANK").is_empty());
    }

    #[test]
    fn test_transaction_amounts_serialize_as_numbers() {
        let tx = Transaction {
            date: "01-06-2025".to_string(),
            description: "Salary Credit".to_string(),
            debit: None,
            credit: Some(Decimal::from_str("50000.00").unwrap()),
            balance: None,
            reference: String::new(),
            branch_code: String::new(),
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["credit"], serde_json::json!(50000.0));
        assert!(json["debit"].is_null());
    }

    #[test]
    fn test_failure_status_record() {
        let outcome = ProcessingOutcome::failure(ErrorKind::NoTablesOrText, None);
        let status = outcome.status();
        assert_eq!(status.transaction_count, 0);
        assert_eq!(status.error_kind, Some(ErrorKind::NoTablesOrText));
        assert_eq!(outcome.bank_name(), "Unknown Bank");
    }
}
