//! Per-document units of work and their results.

use serde::{Deserialize, Serialize};
use url::Url;

use super::projection::{Classification, ExtractionResult};

/// A candidate document for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub country: String,
    pub url: String,
}

impl DocumentReference {
    pub fn new(country: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            url: url.into(),
        }
    }

    /// Extraction strategy implied by this document's URL.
    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::detect(&self.url)
    }
}

/// Extraction strategy for fetched bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    GenericText,
}

impl DocumentFormat {
    /// Decide the format from the file extension of the URL path.
    ///
    /// Only `.pdf` (any case) selects the PDF strategy; everything else,
    /// including a missing extension, is treated as generic text.
    pub fn detect(url: &str) -> Self {
        match path_extension(url).as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            _ => DocumentFormat::GenericText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::GenericText => "generic_text",
        }
    }
}

/// Lowercased extension of the last path segment, without the dot.
fn path_extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL; drop query and fragment by hand
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();
    // A leading dot names a hidden file, not an extension
    let stem_len = file_name.trim_start_matches('.').len();
    let name = &file_name[file_name.len() - stem_len..];
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentOutcome {
    /// The document was fetched, parsed and classified. `extracted` is set
    /// only when the classification reported projections.
    Ok {
        classification: Classification,
        extracted: Option<ExtractionResult>,
    },
    /// The document could not be fetched or opened.
    Error { error: String },
}

/// Result record for one processed URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub country: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

impl DocumentResult {
    /// Build a successful result. Any extraction passed alongside a negative
    /// classification is dropped so the two always agree.
    pub fn ok(
        reference: &DocumentReference,
        classification: Classification,
        extracted: Option<ExtractionResult>,
    ) -> Self {
        let extracted = if classification.contains_projections {
            extracted
        } else {
            None
        };
        Self {
            country: reference.country.clone(),
            url: reference.url.clone(),
            outcome: DocumentOutcome::Ok {
                classification,
                extracted,
            },
        }
    }

    pub fn error(reference: &DocumentReference, error: impl Into<String>) -> Self {
        Self {
            country: reference.country.clone(),
            url: reference.url.clone(),
            outcome: DocumentOutcome::Error {
                error: error.into(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Ok { .. })
    }

    pub fn status(&self) -> &'static str {
        match self.outcome {
            DocumentOutcome::Ok { .. } => "ok",
            DocumentOutcome::Error { .. } => "error",
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match &self.outcome {
            DocumentOutcome::Ok { classification, .. } => Some(classification),
            DocumentOutcome::Error { .. } => None,
        }
    }

    pub fn extracted(&self) -> Option<&ExtractionResult> {
        match &self.outcome {
            DocumentOutcome::Ok { extracted, .. } => extracted.as_ref(),
            DocumentOutcome::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            DocumentOutcome::Error { error } => Some(error),
            DocumentOutcome::Ok { .. } => None,
        }
    }
}
