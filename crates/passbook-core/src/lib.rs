//! Core library for bank statement transaction extraction.
//!
//! This crate provides:
//! - PDF decoding (page text and layout tables)
//! - Bank identification, row classification and column role inference
//! - Date and amount normalization
//! - Transaction assembly, text-line fallback, deduplication and ordering
//! - CSV/JSON export and an in-memory job store

pub mod error;
pub mod export;
pub mod models;
pub mod pdf;
pub mod statement;
pub mod store;

pub use error::{ErrorKind, PassbookError, Result};
pub use models::{
    DateRange, PageContent, PassbookConfig, ProcessingOutcome, RawTable, RowWarning, StatusRecord,
    Transaction, TransactionListing,
};
pub use pdf::{PdfDecoder, PdfExtractor};
pub use statement::{StatementEngine, TransactionExtractor};
pub use store::{JobRecord, JobStatus, JobStore, MemoryJobStore};
