//! Error types for the passbook-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the passbook library.
#[derive(Error, Debug)]
pub enum PassbookError {
    /// PDF decoding error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Transaction extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF decoding.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and the passphrase is missing or wrong.
    #[error("PDF is password protected")]
    PasswordRequired,

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

impl PdfError {
    /// Map a decode failure onto the outcome error kind.
    ///
    /// Anything mentioning a password or encryption is reported as
    /// [`ErrorKind::PasswordRequired`], whatever variant carried it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfError::PasswordRequired => ErrorKind::PasswordRequired,
            other => classify_decode_message(&other.to_string()),
        }
    }
}

/// Errors related to row and line extraction.
///
/// These never abort a document; the offending unit is skipped.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A table row or text line could not be turned into a transaction.
    #[error("row {index} skipped: {reason}")]
    RowParse { index: usize, reason: String },

    /// No transaction data could be extracted.
    #[error("no transaction data found")]
    NoData,
}

/// Document-level failure tag carried by a processing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The document could not be read.
    DecodeFailure,
    /// The document is encrypted and needs a passphrase.
    PasswordRequired,
    /// No page yielded any text or table.
    NoTablesOrText,
    /// Extraction completed but produced no valid record.
    NoTransactionsFound,
    /// A row or line failed; recovered and listed in the outcome's warnings.
    RowParseError,
}

impl ErrorKind {
    /// Serialized tag of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DecodeFailure => "decode_failure",
            ErrorKind::PasswordRequired => "password_required",
            ErrorKind::NoTablesOrText => "no_tables_or_text",
            ErrorKind::NoTransactionsFound => "no_transactions_found",
            ErrorKind::RowParseError => "row_parse_error",
        }
    }

    /// User-facing message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::DecodeFailure => "Error processing PDF",
            ErrorKind::PasswordRequired => "PDF is password protected. Please provide the password.",
            ErrorKind::NoTablesOrText => "No tables or text could be extracted from the PDF",
            ErrorKind::NoTransactionsFound => "No valid transactions found in PDF",
            ErrorKind::RowParseError => "Row could not be parsed",
        }
    }
}

/// Classify a decoder error message.
pub fn classify_decode_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if ["password", "encrypted", "decrypt"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        ErrorKind::PasswordRequired
    } else {
        ErrorKind::DecodeFailure
    }
}

/// Result type for the passbook library.
pub type Result<T> = std::result::Result<T, PassbookError>;
