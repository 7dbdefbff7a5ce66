//! Text extraction from fetched document bytes.
//!
//! Two strategies sit behind [`TextExtractor::extract`]:
//! - PDF: per-page text from a bounded number of leading pages (`lopdf`)
//! - generic text: visible HTML text, one trimmed line per text node (`scraper`)
//!
//! The strategy is chosen by [`DocumentFormat`], which is detected from the
//! document URL.

mod html;
mod pdf;

pub use html::html_to_text;
pub use pdf::pdf_to_text;

use thiserror::Error;
use tracing::warn;

use crate::models::DocumentFormat;

/// Default number of leading PDF pages to read.
pub const DEFAULT_MAX_PDF_PAGES: usize = 20;

/// Errors that can occur during text extraction.
///
/// Only whole-document failures are errors; a page or node that fails on its
/// own is skipped and extraction carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("could not open PDF: {0}")]
    Pdf(String),
}

/// How many leading PDF pages to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    Unlimited,
    First(usize),
}

impl PageLimit {
    /// Build from a configured count where `0` means no limit.
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            PageLimit::Unlimited
        } else {
            PageLimit::First(count)
        }
    }

    pub fn allows(&self, taken: usize) -> bool {
        match self {
            PageLimit::Unlimited => true,
            PageLimit::First(max) => taken < *max,
        }
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        PageLimit::First(DEFAULT_MAX_PDF_PAGES)
    }
}

/// Format-aware text extractor.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    max_pdf_pages: PageLimit,
}

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many leading PDF pages are read.
    pub fn with_max_pdf_pages(mut self, limit: PageLimit) -> Self {
        self.max_pdf_pages = limit;
        self
    }

    pub fn max_pdf_pages(&self) -> PageLimit {
        self.max_pdf_pages
    }

    /// Extract plain text from raw bytes using the strategy for `format`.
    pub fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, ParseError> {
        match format {
            DocumentFormat::Pdf => pdf_to_text(bytes, self.max_pdf_pages),
            DocumentFormat::GenericText => Ok(html_to_text(bytes)),
        }
    }

    /// Like [`extract`](Self::extract), but runs on the blocking pool.
    ///
    /// A panic inside the parser is reported as a [`ParseError`] for this
    /// document instead of unwinding into the caller.
    pub async fn extract_blocking(
        &self,
        bytes: Vec<u8>,
        format: DocumentFormat,
    ) -> Result<String, ParseError> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&bytes, format))
            .await
            .unwrap_or_else(|e| {
                if e.is_panic() {
                    warn!(format = format.as_str(), "Text extraction panicked");
                    Err(ParseError::Pdf("parser panicked on malformed input".to_string()))
                } else {
                    Err(ParseError::Pdf(format!("extraction task failed: {}", e)))
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit_from_count() {
        assert_eq!(PageLimit::from_count(0), PageLimit::Unlimited);
        assert_eq!(PageLimit::from_count(5), PageLimit::First(5));
        assert_eq!(PageLimit::default(), PageLimit::First(20));
    }

    #[test]
    fn test_page_limit_allows() {
        assert!(PageLimit::Unlimited.allows(10_000));
        assert!(PageLimit::First(2).allows(1));
        assert!(!PageLimit::First(2).allows(2));
    }

    #[test]
    fn test_dispatches_on_format() {
        let extractor = TextExtractor::new();
        let text = extractor
            .extract(b"<p>hello</p>", DocumentFormat::GenericText)
            .unwrap();
        assert_eq!(text, "hello");

        let err = extractor
            .extract(b"<p>hello</p>", DocumentFormat::Pdf)
            .unwrap_err();
        assert!(matches!(err, ParseError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_blocking_extraction_matches_inline() {
        let extractor = TextExtractor::new();
        let text = extractor
            .extract_blocking(b"<p>one</p><p>two</p>".to_vec(), DocumentFormat::GenericText)
            .await
            .unwrap();
        assert_eq!(text, "one\ntwo");

        let err = extractor
            .extract_blocking(b"%PDF-1.5 garbage".to_vec(), DocumentFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Pdf(_)));
    }
}
