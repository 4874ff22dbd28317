//! PDF decoding module.

mod extractor;
pub mod layout;

pub use extractor::PdfExtractor;
pub use layout::LayoutTableDetector;

use crate::error::PdfError;
use crate::models::PageContent;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Turns document bytes into per-page text and tables.
pub trait PdfDecoder {
    /// Decode a document, using `password` for encrypted files.
    fn decode(&self, data: &[u8], password: Option<&str>) -> Result<Vec<PageContent>>;
}
