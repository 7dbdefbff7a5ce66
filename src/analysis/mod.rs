//! Document analysis: projection classification and structured extraction.
//!
//! Both capabilities are traits so the pipeline can run against a real model
//! or a test double. The model-backed implementations send one chat request
//! each and decode the reply with [`decode`].

pub mod decode;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::llm::{ChatModel, LlmError, CLASSIFIER_SYSTEM_PROMPT, EXTRACTOR_SYSTEM_PROMPT};
use crate::models::{Classification, ExtractionResult};

pub use decode::{decode_classification, decode_extraction, strip_code_fence};

/// Decides whether a text contains quantitative future tourism projections.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, LlmError>;
}

/// Extracts structured projection records from a text.
#[async_trait]
pub trait ProjectionExtractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        country: &str,
        source_url: &str,
    ) -> Result<ExtractionResult, LlmError>;
}

/// Classifier backed by a chat model.
pub struct ModelClassifier<M: ChatModel> {
    model: Arc<M>,
    max_tokens: u32,
}

impl<M: ChatModel> ModelClassifier<M> {
    pub fn new(model: Arc<M>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }
}

#[async_trait]
impl<M: ChatModel + 'static> Classifier for ModelClassifier<M> {
    async fn classify(&self, text: &str) -> Result<Classification, LlmError> {
        let reply = self
            .model
            .chat(CLASSIFIER_SYSTEM_PROMPT, text, self.max_tokens)
            .await?;
        let classification = decode_classification(&reply);
        debug!(
            contains_projections = classification.contains_projections,
            decoded = classification.is_decoded(),
            "Classified document"
        );
        Ok(classification)
    }
}

/// Projection extractor backed by a chat model.
pub struct ModelExtractor<M: ChatModel> {
    model: Arc<M>,
    max_tokens: u32,
}

impl<M: ChatModel> ModelExtractor<M> {
    pub fn new(model: Arc<M>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }
}

fn extraction_prompt(text: &str, country: &str, source_url: &str) -> String {
    format!("Country: {country}\nSource URL: {source_url}\n\nDocument text:\n{text}")
}

#[async_trait]
impl<M: ChatModel + 'static> ProjectionExtractor for ModelExtractor<M> {
    async fn extract(
        &self,
        text: &str,
        country: &str,
        source_url: &str,
    ) -> Result<ExtractionResult, LlmError> {
        let prompt = extraction_prompt(text, country, source_url);
        let reply = self
            .model
            .chat(EXTRACTOR_SYSTEM_PROMPT, &prompt, self.max_tokens)
            .await?;
        let result = decode_extraction(&reply, country, source_url);
        debug!(
            projections = result.projections.len(),
            decoded = result.raw.is_none(),
            "Extracted projections"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChatModel;

    #[tokio::test]
    async fn test_model_classifier_uses_classifier_prompt() {
        let model = Arc::new(MockChatModel::new().with_reply(
            r#"{"contains_projections": true, "projection_type": "revenue", "years_mentioned": [2030], "confidence": 0.8}"#,
        ));
        let classifier = ModelClassifier::new(model.clone(), 256);

        let c = classifier.classify("Revenue will hit $2B by 2030").await.unwrap();
        assert!(c.contains_projections);

        let calls = model.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, CLASSIFIER_SYSTEM_PROMPT);
        assert_eq!(calls[0].user, "Revenue will hit $2B by 2030");
        assert_eq!(calls[0].max_tokens, 256);
    }

    #[tokio::test]
    async fn test_model_extractor_mentions_country_and_url() {
        let model = Arc::new(MockChatModel::new().with_reply(r#"{"projections": []}"#));
        let extractor = ModelExtractor::new(model.clone(), 2048);

        let result = extractor
            .extract("some text", "Spain", "https://example.com/spain")
            .await
            .unwrap();
        assert_eq!(result.country, "Spain");

        let calls = model.calls().await;
        assert_eq!(calls[0].system, EXTRACTOR_SYSTEM_PROMPT);
        assert!(calls[0].user.contains("Country: Spain"));
        assert!(calls[0].user.contains("https://example.com/spain"));
        assert!(calls[0].user.ends_with("some text"));
        assert_eq!(calls[0].max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let model = Arc::new(MockChatModel::new().failing(LlmError::Connection("down".into())));
        let classifier = ModelClassifier::new(model, 256);
        let err = classifier.classify("text").await.unwrap_err();
        assert!(matches!(err, LlmError::Connection(_)));
    }
}
