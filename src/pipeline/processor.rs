//! Per-document processing: fetch, extract, classify, then extract projections.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::{Classifier, ProjectionExtractor};
use crate::error::DocumentError;
use crate::extract::TextExtractor;
use crate::http_client::DocumentFetcher;
use crate::models::{Classification, DocumentReference, DocumentResult, ExtractionResult};
use crate::utils::shorten;

/// Default character budget for classifier input.
pub const DEFAULT_CLASSIFY_MAX_CHARS: usize = 4000;
/// Default character budget for extractor input.
pub const DEFAULT_EXTRACT_MAX_CHARS: usize = 8000;

/// Runs one document through the full analysis and always yields a result.
pub struct DocumentProcessor {
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: TextExtractor,
    classifier: Arc<dyn Classifier>,
    projections: Arc<dyn ProjectionExtractor>,
    classify_max_chars: usize,
    extract_max_chars: usize,
}

impl DocumentProcessor {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        classifier: Arc<dyn Classifier>,
        projections: Arc<dyn ProjectionExtractor>,
    ) -> Self {
        Self {
            fetcher,
            extractor: TextExtractor::new(),
            classifier,
            projections,
            classify_max_chars: DEFAULT_CLASSIFY_MAX_CHARS,
            extract_max_chars: DEFAULT_EXTRACT_MAX_CHARS,
        }
    }

    pub fn with_text_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the character budgets for classifier and extractor input.
    pub fn with_limits(mut self, classify_max_chars: usize, extract_max_chars: usize) -> Self {
        self.classify_max_chars = classify_max_chars;
        self.extract_max_chars = extract_max_chars;
        self
    }

    /// Process a single document.
    ///
    /// Fetch and whole-document parse failures become a `status=error`
    /// result. Model failures fall back to default judgements and the result
    /// stays `status=ok`.
    pub async fn process(&self, reference: &DocumentReference) -> DocumentResult {
        info!(country = %reference.country, url = %reference.url, "Processing document");

        let text = match self.fetch_text(reference).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = %reference.url, error = %e, "Document failed");
                return DocumentResult::error(reference, e.to_string());
            }
        };

        let classification = self.classify(&text).await;
        let extracted = if classification.contains_projections {
            Some(self.extract_projections(&text, reference).await)
        } else {
            None
        };

        info!(
            url = %reference.url,
            contains_projections = classification.contains_projections,
            projections = extracted.as_ref().map_or(0, |e| e.projections.len()),
            "Document processed"
        );
        DocumentResult::ok(reference, classification, extracted)
    }

    async fn fetch_text(&self, reference: &DocumentReference) -> Result<String, DocumentError> {
        let bytes = self.fetcher.fetch(&reference.url).await?;
        let format = reference.format();
        debug!(bytes = bytes.len(), format = format.as_str(), "Fetched document");

        let text = self.extractor.extract_blocking(bytes, format).await?;
        debug!(chars = text.chars().count(), "Extracted text");
        Ok(text)
    }

    async fn classify(&self, text: &str) -> Classification {
        let input = shorten(text, self.classify_max_chars);
        match self.classifier.classify(&input).await {
            Ok(classification) => {
                if classification.raw.is_some() {
                    warn!("Classifier reply could not be decoded; assuming no projections");
                }
                classification
            }
            Err(e) => {
                warn!(error = %e, "Classifier unavailable; assuming no projections");
                Classification::unavailable(e.to_string())
            }
        }
    }

    async fn extract_projections(
        &self,
        text: &str,
        reference: &DocumentReference,
    ) -> ExtractionResult {
        let input = shorten(text, self.extract_max_chars);
        match self
            .projections
            .extract(&input, &reference.country, &reference.url)
            .await
        {
            Ok(result) => {
                if result.raw.is_some() {
                    warn!(url = %reference.url, "Extractor reply could not be decoded");
                }
                result
            }
            Err(e) => {
                warn!(url = %reference.url, error = %e, "Extractor unavailable");
                ExtractionResult::unavailable(&reference.country, &reference.url, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::RetrievalError;
    use crate::llm::LlmError;
    use crate::testing::{break_pages, sample_pdf, MockClassifier, MockExtractor, MockFetcher};

    fn positive() -> Classification {
        Classification {
            contains_projections: true,
            confidence: 0.9,
            ..Classification::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_analysis() {
        let url = "https://x/missing.html";
        let fetcher = Arc::new(MockFetcher::new().with_error(
            url,
            RetrievalError::Status {
                url: url.to_string(),
                status: 404,
            },
        ));
        let classifier = Arc::new(MockClassifier::new(positive()));
        let processor = DocumentProcessor::new(
            fetcher,
            classifier.clone(),
            Arc::new(MockExtractor::empty()),
        );

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert_eq!(result.status(), "error");
        assert_eq!(result.error_message(), Some("HTTP 404 fetching https://x/missing.html"));
        assert!(classifier.inputs().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_terminal() {
        let url = "https://x/report.pdf";
        let fetcher = Arc::new(MockFetcher::new().with_body(url, b"not a pdf".to_vec()));
        let classifier = Arc::new(MockClassifier::new(positive()));
        let processor = DocumentProcessor::new(
            fetcher,
            classifier.clone(),
            Arc::new(MockExtractor::empty()),
        );

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert!(!result.is_ok());
        assert!(result.error_message().unwrap().contains("PDF"));
        assert!(classifier.inputs().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_page_still_classified() {
        let url = "https://x/report.pdf";
        let bytes = sample_pdf(&["Alpha page", "Bravo page"]).unwrap();
        let fetcher = Arc::new(MockFetcher::new().with_body(url, break_pages(&bytes, &[1]).unwrap()));
        let classifier = Arc::new(MockClassifier::new(Classification::default()));
        let processor = DocumentProcessor::new(
            fetcher,
            classifier.clone(),
            Arc::new(MockExtractor::empty()),
        );

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert_eq!(result.status(), "ok");
        assert_eq!(classifier.inputs().await, vec!["Bravo page"]);
    }

    #[tokio::test]
    async fn test_pdf_without_readable_pages_is_classified_empty() {
        let url = "https://x/report.pdf";
        let bytes = sample_pdf(&["Alpha page", "Bravo page"]).unwrap();
        let fetcher = Arc::new(MockFetcher::new().with_body(url, break_pages(&bytes, &[1, 2]).unwrap()));
        let classifier = Arc::new(MockClassifier::new(Classification::default()));
        let processor = DocumentProcessor::new(
            fetcher,
            classifier.clone(),
            Arc::new(MockExtractor::empty()),
        );

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert_eq!(result.status(), "ok");
        assert_eq!(classifier.inputs().await, vec![""]);
        assert!(result.extracted().is_none());
    }

    #[tokio::test]
    async fn test_inputs_are_length_bounded() {
        let url = "https://x/page.html";
        let body = "word ".repeat(5000);
        let fetcher = Arc::new(MockFetcher::new().with_body(url, body.into_bytes()));
        let classifier = Arc::new(MockClassifier::new(positive()));
        let extractor = Arc::new(MockExtractor::empty());
        let processor =
            DocumentProcessor::new(fetcher, classifier.clone(), extractor.clone()).with_limits(100, 200);

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert!(result.is_ok());

        let classified = classifier.inputs().await;
        assert!(classified[0].chars().count() <= 100);
        let extracted = extractor.inputs().await;
        assert!(extracted[0].text.chars().count() <= 200);
        assert_eq!(extracted[0].country, "USA");
        assert_eq!(extracted[0].source_url, url);
    }

    #[tokio::test]
    async fn test_model_outage_is_absorbed() {
        let url = "https://x/page.html";
        let fetcher = Arc::new(MockFetcher::new().with_body(url, b"<p>Arrivals</p>".to_vec()));
        let classifier = Arc::new(MockClassifier::failing(LlmError::Connection(
            "refused".to_string(),
        )));
        let extractor = Arc::new(MockExtractor::empty());
        let processor = DocumentProcessor::new(fetcher, classifier, extractor.clone());

        let result = processor.process(&DocumentReference::new("USA", url)).await;
        assert!(result.is_ok());
        let classification = result.classification().unwrap();
        assert!(!classification.contains_projections);
        assert!(classification.error.is_some());
        assert!(result.extracted().is_none());
        assert!(extractor.inputs().await.is_empty());
    }

    #[tokio::test]
    async fn test_extractor_outage_keeps_empty_projections() {
        let url = "https://x/page.html";
        let fetcher = Arc::new(MockFetcher::new().with_body(url, b"<p>Arrivals</p>".to_vec()));
        let processor = DocumentProcessor::new(
            fetcher,
            Arc::new(MockClassifier::new(positive())),
            Arc::new(MockExtractor::failing(LlmError::Api("HTTP 503".to_string()))),
        );

        let result = processor.process(&DocumentReference::new("Spain", url)).await;
        let extracted = result.extracted().unwrap();
        assert!(extracted.projections.is_empty());
        assert_eq!(extracted.country, "Spain");
        assert_eq!(extracted.error.as_deref(), Some("API error: HTTP 503"));
    }
}
