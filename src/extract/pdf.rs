//! PDF text extraction.

use lopdf::Document;
use tracing::debug;

use super::{PageLimit, ParseError};

/// Separator placed between page texts.
const PAGE_SEPARATOR: &str = "\n\n";

/// Extract text from the leading pages of a PDF held in memory.
///
/// A page whose text cannot be extracted contributes an empty string. Failure
/// to open the document at all is a [`ParseError`].
pub fn pdf_to_text(bytes: &[u8], limit: PageLimit) -> Result<String, ParseError> {
    let doc = Document::load_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    let mut texts = Vec::new();

    for page_num in pages.keys().copied() {
        if !limit.allows(texts.len()) {
            break;
        }
        let text = match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                debug!(page = page_num, error = %e, "PDF page text extraction failed");
                String::new()
            }
        };
        texts.push(text);
    }

    debug!(
        pages_total = pages.len(),
        pages_read = texts.len(),
        "PDF text extracted"
    );

    Ok(texts.join(PAGE_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{break_pages, sample_pdf};

    #[test]
    fn test_extracts_every_page_in_order() {
        let bytes = sample_pdf(&["Alpha page", "Bravo page", "Charlie page"]).unwrap();
        let text = pdf_to_text(&bytes, PageLimit::Unlimited).unwrap();

        let alpha = text.find("Alpha").unwrap();
        let bravo = text.find("Bravo").unwrap();
        let charlie = text.find("Charlie").unwrap();
        assert!(alpha < bravo && bravo < charlie);
        assert!(text.contains(PAGE_SEPARATOR));
    }

    #[test]
    fn test_respects_page_limit() {
        let bytes = sample_pdf(&["Alpha page", "Bravo page", "Charlie page"]).unwrap();
        let text = pdf_to_text(&bytes, PageLimit::First(2)).unwrap();

        assert!(text.contains("Alpha"));
        assert!(text.contains("Bravo"));
        assert!(!text.contains("Charlie"));
    }

    #[test]
    fn test_same_bytes_same_text() {
        let bytes = sample_pdf(&["Forecast 2026", "Forecast 2027"]).unwrap();
        let first = pdf_to_text(&bytes, PageLimit::default()).unwrap();
        let second = pdf_to_text(&bytes, PageLimit::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreadable_page_contributes_empty_text() {
        let bytes = sample_pdf(&["Alpha page", "Bravo page"]).unwrap();
        let broken = break_pages(&bytes, &[1]).unwrap();

        let text = pdf_to_text(&broken, PageLimit::Unlimited).unwrap();
        assert_eq!(text, "\n\nBravo page\n");
    }

    #[test]
    fn test_all_pages_unreadable_is_still_ok() {
        let bytes = sample_pdf(&["Alpha page", "Bravo page"]).unwrap();
        let broken = break_pages(&bytes, &[1, 2]).unwrap();

        let text = pdf_to_text(&broken, PageLimit::Unlimited).unwrap();
        assert_eq!(text, PAGE_SEPARATOR);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = pdf_to_text(b"definitely not a pdf", PageLimit::default()).unwrap_err();
        assert!(matches!(err, ParseError::Pdf(_)));
        assert!(err.to_string().starts_with("could not open PDF"));
    }
}
