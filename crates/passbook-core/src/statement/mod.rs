//! Bank statement transaction extraction.

mod aggregate;
mod assembler;
pub mod bank;
pub mod classifier;
pub mod columns;
mod dedup;
mod engine;
pub mod rules;
pub mod text;

pub use aggregate::{aggregate, date_range};
pub use assembler::{TransactionAssembler, DEFAULT_DESCRIPTION};
pub use bank::{BankEntry, BankTable, UNKNOWN_BANK, UNKNOWN_BANK_NAME};
pub use classifier::{RowClass, RowClassifier};
pub use columns::{ColumnInference, ColumnRoleInferencer, InferenceStrategy};
pub use dedup::{dedup, DedupKey};
pub use engine::{Extracted, StatementEngine};
pub use text::TextLineExtractor;

use crate::models::{PageContent, ProcessingOutcome};

/// Trait for statement transaction extractors.
pub trait TransactionExtractor {
    /// Extract transactions from decoded pages.
    fn extract(&self, pages: &[PageContent]) -> ProcessingOutcome;

    /// Extract transactions from plain text treated as a single page.
    fn extract_from_text(&self, text: &str) -> ProcessingOutcome {
        self.extract(&[PageContent::from_text(1, text)])
    }
}

impl TransactionExtractor for StatementEngine {
    fn extract(&self, pages: &[PageContent]) -> ProcessingOutcome {
        self.process_pages(pages)
    }
}
