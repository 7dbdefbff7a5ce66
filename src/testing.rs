//! Testing utilities including mock implementations.
//!
//! These let the pipeline run without network access or a model server:
//! a fetcher serving canned bytes, scripted classifier/extractor/chat doubles
//! that record what they were asked, and an in-memory PDF builder.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use tokio::sync::Mutex;

use crate::analysis::{Classifier, ProjectionExtractor};
use crate::http_client::{DocumentFetcher, RetrievalError};
use crate::llm::{ChatModel, LlmError};
use crate::models::{Classification, ExtractionResult};

/// A fetcher serving predefined responses by URL.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<Vec<u8>, RetrievalError>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), Ok(body.into()));
        self
    }

    /// Fail requests for `url` with `error`.
    pub fn with_error(mut self, url: impl Into<String>, error: RetrievalError) -> Self {
        self.responses.insert(url.into(), Err(error));
        self
    }

    /// URLs fetched so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        self.calls.lock().await.push(url.to_string());
        match self.responses.get(url) {
            Some(response) => response.clone(),
            None => Err(RetrievalError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// A classifier returning queued responses, then a fixed fallback.
pub struct MockClassifier {
    queued: Mutex<VecDeque<Result<Classification, LlmError>>>,
    fallback: Result<Classification, LlmError>,
    inputs: Mutex<Vec<String>>,
}

impl MockClassifier {
    /// Always answer with `classification`.
    pub fn new(classification: Classification) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: Ok(classification),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::new(Classification::default())
        }
    }

    /// Answer the next call with `classification` before falling back.
    pub fn then(mut self, classification: Classification) -> Self {
        self.queued.get_mut().push_back(Ok(classification));
        self
    }

    /// Texts passed to `classify`, in call order.
    pub async fn inputs(&self) -> Vec<String> {
        self.inputs.lock().await.clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, LlmError> {
        self.inputs.lock().await.push(text.to_string());
        match self.queued.lock().await.pop_front() {
            Some(response) => response,
            None => self.fallback.clone(),
        }
    }
}

/// Arguments of one extractor call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCall {
    pub text: String,
    pub country: String,
    pub source_url: String,
}

enum ExtractorBehavior {
    Empty,
    Fixed(ExtractionResult),
    Fail(LlmError),
}

/// An extractor with a fixed behaviour that records its inputs.
pub struct MockExtractor {
    behavior: ExtractorBehavior,
    inputs: Mutex<Vec<ExtractionCall>>,
}

impl MockExtractor {
    fn with_behavior(behavior: ExtractorBehavior) -> Self {
        Self {
            behavior,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Answer with no projections for whichever document is asked about.
    pub fn empty() -> Self {
        Self::with_behavior(ExtractorBehavior::Empty)
    }

    /// Always answer with `result`.
    pub fn new(result: ExtractionResult) -> Self {
        Self::with_behavior(ExtractorBehavior::Fixed(result))
    }

    /// Always fail with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self::with_behavior(ExtractorBehavior::Fail(error))
    }

    pub async fn inputs(&self) -> Vec<ExtractionCall> {
        self.inputs.lock().await.clone()
    }
}

#[async_trait]
impl ProjectionExtractor for MockExtractor {
    async fn extract(
        &self,
        text: &str,
        country: &str,
        source_url: &str,
    ) -> Result<ExtractionResult, LlmError> {
        self.inputs.lock().await.push(ExtractionCall {
            text: text.to_string(),
            country: country.to_string(),
            source_url: source_url.to_string(),
        });
        match &self.behavior {
            ExtractorBehavior::Empty => Ok(ExtractionResult::new(country, source_url)),
            ExtractorBehavior::Fixed(result) => Ok(result.clone()),
            ExtractorBehavior::Fail(error) => Err(error.clone()),
        }
    }
}

/// Arguments of one chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// A chat model with a scripted reply.
pub struct MockChatModel {
    reply: Result<String, LlmError>,
    calls: Mutex<Vec<ChatCall>>,
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatModel {
    /// Replies with an empty string until configured.
    pub fn new() -> Self {
        Self {
            reply: Ok(String::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Ok(reply.into());
        self
    }

    pub fn failing(mut self, error: LlmError) -> Self {
        self.reply = Err(error);
        self
    }

    pub async fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.calls.lock().await.push(ChatCall {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens,
        });
        self.reply.clone()
    }
}

/// Build a PDF with one page of text per entry in `pages`.
pub fn sample_pdf(pages: &[&str]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().map_err(lopdf::Error::from)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(lopdf::Error::from)?;
    Ok(buf)
}

/// Point the `/Contents` of the given 1-based pages at an object that does
/// not exist, leaving the rest of the document intact.
pub fn break_pages(bytes: &[u8], page_numbers: &[u32]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::load_mem(bytes)?;
    let missing = Object::Reference((doc.max_id + 1000, 0));
    for (number, page_id) in doc.get_pages() {
        if page_numbers.contains(&number) {
            doc.get_object_mut(page_id)
                .and_then(Object::as_dict_mut)?
                .set("Contents", missing.clone());
        }
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(lopdf::Error::from)?;
    Ok(buf)
}
