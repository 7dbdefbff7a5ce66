//! Configuration management for tourproj using the prefer crate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extract::{PageLimit, DEFAULT_MAX_PDF_PAGES};
use crate::http_client::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use crate::llm::LlmConfig;
use crate::pipeline::{DEFAULT_CLASSIFY_MAX_CHARS, DEFAULT_EXTRACT_MAX_CHARS};
use crate::sources::StaticSourceRegistry;
use crate::storage::DEFAULT_OUTPUT_FILE;

/// Countries processed when none are configured.
pub const DEFAULT_COUNTRIES: &[&str] = &["USA"];

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Countries to process, in order.
    pub countries: Vec<String>,
    /// Where the run result is written.
    pub output: PathBuf,
    /// User agent for document requests.
    pub user_agent: String,
    /// Document request timeout in seconds.
    pub request_timeout: u64,
    /// Leading PDF pages read per document.
    pub max_pdf_pages: PageLimit,
    /// Character budget for classifier input.
    pub classify_max_chars: usize,
    /// Character budget for extractor input.
    pub extract_max_chars: usize,
    /// Country to URL table used by the registry.
    pub sources: StaticSourceRegistry,
    /// Model access.
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            user_agent: USER_AGENT.to_string(),
            request_timeout: DEFAULT_TIMEOUT_SECS,
            max_pdf_pages: PageLimit::First(DEFAULT_MAX_PDF_PAGES),
            classify_max_chars: DEFAULT_CLASSIFY_MAX_CHARS,
            extract_max_chars: DEFAULT_EXTRACT_MAX_CHARS,
            sources: StaticSourceRegistry::builtin(),
            llm: LlmConfig::default(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Countries to process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    /// Output file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Leading PDF pages to read; 0 reads every page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pdf_pages: Option<usize>,
    /// Character budget for classifier input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classify_max_chars: Option<usize>,
    /// Character budget for extractor input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_max_chars: Option<usize>,
    /// Extra or replacement sources per country.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, Vec<String>>,
    /// LLM configuration.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers tourproj config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("tourproj").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("Ignoring config file {}: {}", path.display(), e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML, and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref countries) = self.countries {
            settings.countries = countries.clone();
        }
        if let Some(ref output) = self.output {
            settings.output = self.resolve_path(output, base_dir);
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(pages) = self.max_pdf_pages {
            settings.max_pdf_pages = PageLimit::from_count(pages);
        }
        if let Some(chars) = self.classify_max_chars {
            settings.classify_max_chars = chars;
        }
        if let Some(chars) = self.extract_max_chars {
            settings.extract_max_chars = chars;
        }
        settings.sources.extend(self.sources.clone());
        settings.llm = self.llm.clone();
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
///
/// LLM environment variables are applied last and win over the file.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), String> {
    let config = match options.config_path {
        Some(ref path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            Config::load_from_path(Path::new(&expanded)).await?
        }
        None => Config::load().await,
    };

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);
    settings.llm = settings.llm.with_env_overrides();

    if let Some(ref path) = config.source_path {
        debug!("Loaded config from {}", path.display());
    }
    Ok((settings, config))
}
