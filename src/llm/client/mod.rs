//! LLM client for tourism document classification and extraction.
//!
//! Supports the Ollama chat API for local inference and any
//! OpenAI-compatible chat completions endpoint.

mod config;
mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use config::{LlmConfig, LlmProvider};
pub use prompts::{
    CHECK_PROMPT, CHECK_SYSTEM_PROMPT, CLASSIFIER_SYSTEM_PROMPT, EXTRACTOR_SYSTEM_PROMPT,
};

/// A chat-style language model: one system prompt, one user message, one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError>;
}

/// LLM client for document processing.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn messages<'a>(system: &'a str, user: &'a str) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage {
            role: "system",
            content: system,
        },
        ChatMessage {
            role: "user",
            content: user,
        },
    ]
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions request.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send a fixed prompt and return the reply, for connectivity checks.
    pub async fn ping(&self) -> Result<String, LlmError> {
        info!(
            provider = ?self.config.provider,
            model = %self.config.model,
            "Checking LLM connectivity"
        );
        let reply = self.chat(CHECK_SYSTEM_PROMPT, CHECK_PROMPT, 20).await?;
        Ok(reply.trim().to_string())
    }

    fn ensure_ready(&self) -> Result<(), LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }
        if self.config.provider == LlmProvider::OpenAI && self.config.api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(())
    }

    /// Call the Ollama chat API.
    async fn call_ollama(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: &self.config.model,
            messages: messages(system, user),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.message.content.unwrap_or_default())
    }

    /// Call an OpenAI-compatible chat completions API.
    async fn call_openai(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let request = CompletionRequest {
            model: &self.config.model,
            messages: messages(system, user),
            temperature: self.config.temperature,
            max_tokens,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let completion: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LlmError::Parse("response contained no choices".to_string()))
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.ensure_ready()?;
        debug!(
            model = %self.config.model,
            chars = user.len(),
            max_tokens,
            "Sending chat request"
        );
        match self.config.provider {
            LlmProvider::Ollama => self.call_ollama(system, user, max_tokens).await,
            LlmProvider::OpenAI => self.call_openai(system, user, max_tokens).await,
        }
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Failed to connect to LLM service
    Connection(String),
    /// API returned an error
    Api(String),
    /// Failed to parse response
    Parse(String),
    /// LLM is disabled
    Disabled,
    /// An OpenAI-compatible provider was selected without credentials
    MissingApiKey,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Connection(msg) => write!(f, "Connection error: {}", msg),
            LlmError::Api(msg) => write!(f, "API error: {}", msg),
            LlmError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LlmError::Disabled => write!(f, "LLM is disabled"),
            LlmError::MissingApiKey => write!(f, "No API key configured for LLM provider"),
        }
    }
}

impl std::error::Error for LlmError {}
