//! Document-level orchestration of the extraction pipeline.

use tracing::{debug, info, warn};

use super::aggregate::aggregate;
use super::assembler::TransactionAssembler;
use super::classifier::RowClassifier;
use super::columns::ColumnRoleInferencer;
use super::dedup::dedup;
use super::text::TextLineExtractor;
use crate::error::{ErrorKind, ExtractionError};
use crate::models::{
    AmountFillOrder, PageContent, PassbookConfig, ProcessingOutcome, RawTable, RowWarning,
    TextFallback, Transaction,
};
use crate::pdf::PdfDecoder;

/// Transactions and skipped rows from one page or table.
#[derive(Debug, Default)]
pub struct Extracted {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<RowWarning>,
}

impl Extracted {
    fn append(&mut self, other: Extracted) {
        self.transactions.extend(other.transactions);
        self.warnings.extend(other.warnings);
    }
}

/// Stateless, configurable statement extraction engine.
#[derive(Debug, Clone, Default)]
pub struct StatementEngine {
    config: PassbookConfig,
}

impl StatementEngine {
    pub fn new(config: PassbookConfig) -> Self {
        Self { config }
    }

    pub fn with_text_fallback(mut self, mode: TextFallback) -> Self {
        self.config.extraction.text_fallback = mode;
        self
    }

    pub fn with_fill_order(mut self, order: AmountFillOrder) -> Self {
        self.config.extraction.amount_fill_order = order;
        self
    }

    pub fn config(&self) -> &PassbookConfig {
        &self.config
    }

    /// Bank code for a document's text.
    pub fn identify_bank<'a>(&'a self, text: &str) -> &'a str {
        self.config.banks.identify(text)
    }

    /// Decode a document and extract its transactions.
    ///
    /// Decode failures become failed outcomes; this never returns an error.
    pub fn process_document<D>(&self, decoder: &D, data: &[u8], password: Option<&str>) -> ProcessingOutcome
    where
        D: PdfDecoder + ?Sized,
    {
        match decoder.decode(data, password) {
            Ok(pages) => self.process_pages(&pages),
            Err(e) => {
                let kind = e.kind();
                warn!("Failed to decode document: {}", e);
                let message = match kind {
                    ErrorKind::DecodeFailure => format!("{}: {}", kind.message(), e),
                    other => other.message().to_string(),
                };
                ProcessingOutcome::failure_with_message(kind, None, message)
            }
        }
    }

    /// Extract, deduplicate and aggregate transactions from decoded pages.
    pub fn process_pages(&self, pages: &[PageContent]) -> ProcessingOutcome {
        if pages.iter().all(PageContent::is_empty) {
            warn!("No page yielded text or tables");
            return ProcessingOutcome::failure(ErrorKind::NoTablesOrText, None);
        }

        let full_text = pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let bank_code = self.identify_bank(&full_text);
        info!("Processing {} pages (bank: {})", pages.len(), bank_code);

        let mut extracted = Extracted::default();
        for page in pages {
            extracted.append(self.extract_page(page));
        }
        let Extracted {
            transactions,
            warnings,
        } = extracted;
        if !warnings.is_empty() {
            warn!("Skipped {} unparseable rows", warnings.len());
        }

        let count = transactions.len();
        let transactions = dedup(transactions);
        if transactions.len() < count {
            debug!("Removed {} duplicate transactions", count - transactions.len());
        }

        let mut outcome = aggregate(transactions, bank_code, &self.config.banks);
        outcome.warnings = warnings;
        outcome
    }

    /// Transactions from one page's tables, plus its text when configured.
    pub fn extract_page(&self, page: &PageContent) -> Extracted {
        let mut extracted = Extracted::default();
        for table in &page.tables {
            extracted.append(self.extract_table(page.number, table));
        }

        let run_text = match self.config.extraction.text_fallback {
            TextFallback::Always => true,
            TextFallback::WhenTablesEmpty => extracted.transactions.is_empty(),
        };
        if run_text && !page.text.trim().is_empty() {
            let from_text = self.text_extractor().extract(&page.text);
            debug!("Page {}: {} transactions from text", page.number, from_text.len());
            extracted.transactions.extend(from_text);
        }

        debug!("Page {}: {} transactions", page.number, extracted.transactions.len());
        extracted
    }

    /// Transactions from a single table on page `page`.
    pub fn extract_table(&self, page: u32, table: &RawTable) -> Extracted {
        let mut extracted = Extracted::default();
        if table.len() < 2 {
            return extracted;
        }

        let keywords = &self.config.keywords;
        let extraction = &self.config.extraction;
        let inference = ColumnRoleInferencer::new(keywords)
            .with_sample_rows(extraction.inference_sample_rows)
            .with_fill_order(extraction.amount_fill_order)
            .infer(&table.rows);
        let classifier = RowClassifier::new(keywords);
        let assembler =
            TransactionAssembler::new(keywords).with_fill_order(extraction.amount_fill_order);

        for (index, row) in table.rows.iter().enumerate().skip(inference.data_start) {
            if row.len() < 3 {
                let err = ExtractionError::RowParse {
                    index,
                    reason: format!("{} cells", row.len()),
                };
                debug!("Page {}: {}", page, err);
                extracted.warnings.push(RowWarning::new(page, index, err.to_string()));
                continue;
            }
            if !classifier.classify(row).is_data() {
                continue;
            }
            if let Some(tx) = assembler.assemble(row, &inference.mapping) {
                extracted.transactions.push(tx);
            }
        }
        extracted
    }

    fn text_extractor(&self) -> TextLineExtractor<'_> {
        TextLineExtractor::new(&self.config.keywords)
            .with_min_line_length(self.config.extraction.min_text_line_length)
    }
}
