//! LLM integration for document classification and projection extraction.
//!
//! Talks to either a local Ollama server or any OpenAI-compatible chat API
//! (OpenAI, Groq, the Hugging Face inference router).

mod client;

pub use client::{ChatModel, LlmClient, LlmConfig, LlmError, LlmProvider};
pub use client::{
    CHECK_PROMPT, CHECK_SYSTEM_PROMPT, CLASSIFIER_SYSTEM_PROMPT, EXTRACTOR_SYSTEM_PROMPT,
};
