//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// Hugging Face inference router (OpenAI-compatible).
const HUGGINGFACE_ENDPOINT: &str = "https://router.huggingface.co";
/// Model used when a Hugging Face token is the only credential.
const HUGGINGFACE_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama API (local, default)
    #[default]
    Ollama,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, Hugging Face, etc.)
    OpenAI,
}

impl LlmProvider {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" | "huggingface" | "hf" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether model calls are enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (ollama or openai)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Response token budget for classification
    #[serde(default = "default_classify_max_tokens")]
    pub classify_max_tokens: u32,
    /// Response token budget for projection extraction
    #[serde(default = "default_extract_max_tokens")]
    pub extract_max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_classify_max_tokens() -> u32 {
    256
}

fn default_extract_max_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default()
    }
}

impl LlmConfig {
    /// Defaults without any environment lookups.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            classify_max_tokens: default_classify_max_tokens(),
            extract_max_tokens: default_extract_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::base_default()
    }

    /// Apply environment variable overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Supported variables:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "ollama" (default), "openai", "groq", "together", "huggingface"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `HF_TOKEN`, `GROQ_API_KEY`, `OPENAI_API_KEY`: provider credentials
    ///
    /// An explicit `LLM_PROVIDER` wins over auto-detection from credentials.
    /// Without one, the first credential found in the order above selects
    /// its provider.
    pub fn with_overrides_from<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = var("LLM_PROVIDER");
        if let Some(provider) = explicit_provider.as_deref().and_then(LlmProvider::from_name) {
            self.provider = provider;
        }

        let explicit_endpoint = var("LLM_ENDPOINT");
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        }

        if let Some(val) = var("LLM_API_KEY") {
            self.api_key = Some(val);
        }

        let mut detected_model = None;

        if let Some(ref provider_str) = explicit_provider {
            let provider_lower = provider_str.to_lowercase();

            if explicit_endpoint.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.endpoint = "https://api.groq.com/openai".to_string(),
                    "openai" => self.endpoint = "https://api.openai.com".to_string(),
                    "together" => self.endpoint = "https://api.together.xyz".to_string(),
                    "huggingface" | "hf" => self.endpoint = HUGGINGFACE_ENDPOINT.to_string(),
                    _ => {}
                }
            }

            if self.api_key.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.api_key = var("GROQ_API_KEY"),
                    "openai" => self.api_key = var("OPENAI_API_KEY"),
                    "huggingface" | "hf" => {
                        self.api_key = var("HF_TOKEN");
                        detected_model = Some(HUGGINGFACE_MODEL);
                    }
                    _ => {}
                }
            }
        } else if self.api_key.is_none() {
            let detected = [
                ("HF_TOKEN", HUGGINGFACE_ENDPOINT, Some(HUGGINGFACE_MODEL)),
                ("GROQ_API_KEY", "https://api.groq.com/openai", None),
                ("OPENAI_API_KEY", "https://api.openai.com", None),
            ]
            .into_iter()
            .find_map(|(key_var, endpoint, model)| var(key_var).map(|key| (key, endpoint, model)));

            if let Some((key, endpoint, model)) = detected {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
                if explicit_endpoint.is_none() {
                    self.endpoint = endpoint.to_string();
                }
                detected_model = model;
            }
        }

        if let Some(model) = detected_model {
            self.model = model.to_string();
        }
        if let Some(val) = var("LLM_MODEL") {
            self.model = val;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}
