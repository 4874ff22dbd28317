//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::layout::LayoutTableDetector;
use super::{PdfDecoder, Result};
use crate::error::PdfError;
use crate::models::{PageContent, PdfConfig};

/// Statement decoder built on lopdf.
///
/// Holds only settings, so one instance can decode many documents.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    max_pages: usize,
    layout: Option<LayoutTableDetector>,
}

/// A loaded (and, if needed, decrypted) document.
struct LoadedPdf {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create an extractor with layout table detection enabled.
    pub fn new() -> Self {
        Self {
            max_pages: 0,
            layout: Some(LayoutTableDetector::default()),
        }
    }

    /// Build an extractor from configuration.
    pub fn from_config(config: &PdfConfig) -> Self {
        let layout = config.detect_layout_tables.then(|| {
            LayoutTableDetector::new()
                .with_min_rows(config.min_table_rows)
                .with_min_columns(config.min_table_columns)
        });
        Self {
            max_pages: config.max_pages,
            layout,
        }
    }

    /// Limit the number of decoded pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Replace or disable layout table detection.
    pub fn with_layout_tables(mut self, layout: Option<LayoutTableDetector>) -> Self {
        self.layout = layout;
        self
    }

    fn load(&self, data: &[u8], password: Option<&str>) -> Result<LoadedPdf> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            let candidates = password.into_iter().chain(std::iter::once(""));
            let mut decrypted = false;
            for candidate in candidates {
                if doc.decrypt(candidate).is_ok() {
                    decrypted = true;
                    break;
                }
            }
            if !decrypted {
                return Err(PdfError::PasswordRequired);
            }
            debug!("Decrypted PDF");

            // pdf-extract reads the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(LoadedPdf {
            document: doc,
            raw_data,
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadedPdf {
    fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }

    /// Text of every page, in page order.
    fn page_texts(&self) -> Vec<String> {
        let numbers = self.page_numbers();

        match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(texts) if texts.len() == numbers.len() => return texts,
            Ok(texts) => debug!(
                "pdf-extract returned {} pages, expected {}; using lopdf",
                texts.len(),
                numbers.len()
            ),
            Err(e) => debug!("pdf-extract failed ({}); using lopdf", e),
        }

        numbers
            .into_iter()
            .map(|number| {
                self.extract_page_text(number).unwrap_or_else(|e| {
                    warn!("Skipping text of page {}: {}", number, e);
                    String::new()
                })
            })
            .collect()
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if !self.document.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }
        self.document
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

impl PdfDecoder for PdfExtractor {
    fn decode(&self, data: &[u8], password: Option<&str>) -> Result<Vec<PageContent>> {
        let loaded = self.load(data, password)?;
        let mut texts = loaded.page_texts();
        if self.max_pages > 0 && texts.len() > self.max_pages {
            debug!("Limiting to the first {} of {} pages", self.max_pages, texts.len());
            texts.truncate(self.max_pages);
        }

        let pages: Vec<PageContent> = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let tables = self
                    .layout
                    .as_ref()
                    .map(|detector| detector.detect(&text))
                    .unwrap_or_default();
                PageContent {
                    number: index as u32 + 1,
                    text,
                    tables,
                }
            })
            .collect();

        debug!(
            "Decoded {} pages, {} layout tables",
            pages.len(),
            pages.iter().map(|p| p.tables.len()).sum::<usize>()
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let extractor = PdfExtractor::new();
        let err = extractor.decode(b"not a pdf", None).unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_from_config() {
        let config = PdfConfig {
            detect_layout_tables: false,
            max_pages: 3,
            ..PdfConfig::default()
        };
        let extractor = PdfExtractor::from_config(&config);
        assert_eq!(extractor.max_pages, 3);
        assert!(extractor.layout.is_none());
    }
}
