//! Model judgements and extracted projection records.

use serde::{Deserialize, Serialize};

/// Which kind of projection a document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionType {
    Arrivals,
    Revenue,
    Both,
    #[default]
    None,
}

impl ProjectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionType::Arrivals => "arrivals",
            ProjectionType::Revenue => "revenue",
            ProjectionType::Both => "both",
            ProjectionType::None => "none",
        }
    }
}

/// Result of asking the model whether a document contains future projections.
///
/// When the model reply cannot be decoded, `raw` holds the reply verbatim and
/// the judgement falls back to "no projections" with zero confidence. When the
/// model could not be reached at all, `error` holds the failure instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub contains_projections: bool,
    #[serde(default)]
    pub projection_type: ProjectionType,
    #[serde(default)]
    pub years_mentioned: Vec<i32>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            contains_projections: false,
            projection_type: ProjectionType::None,
            years_mentioned: Vec::new(),
            confidence: 0.0,
            raw: None,
            error: None,
        }
    }
}

impl Classification {
    /// Fallback used when the model reply is not a valid classification.
    pub fn undecodable(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Fallback used when the model call itself failed.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// True when this value came from a well-formed model reply.
    pub fn is_decoded(&self) -> bool {
        self.raw.is_none() && self.error.is_none()
    }
}

/// Tourism indicator a projection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Arrivals,
    Revenue,
}

/// Unit of a projected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "visitors")]
    Visitors,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "local_currency")]
    LocalCurrency,
}

/// A single forward-looking figure for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub indicator: Indicator,
    pub year: i32,
    pub value: f64,
    pub unit: Unit,
}

impl ProjectionRecord {
    pub fn new(indicator: Indicator, year: i32, value: f64, unit: Unit) -> Self {
        Self {
            indicator,
            year,
            value,
            unit,
        }
    }
}

/// Structured projections extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub country: String,
    pub source_url: String,
    #[serde(default)]
    pub projections: Vec<ProjectionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn new(country: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            source_url: source_url.into(),
            projections: Vec::new(),
            raw: None,
            error: None,
        }
    }

    pub fn with_projection(mut self, record: ProjectionRecord) -> Self {
        self.projections.push(record);
        self
    }

    /// Fallback used when the model reply is not a valid extraction.
    pub fn undecodable(
        country: impl Into<String>,
        source_url: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::new(country, source_url)
        }
    }

    /// Fallback used when the model call itself failed.
    pub fn unavailable(
        country: impl Into<String>,
        source_url: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(country, source_url)
        }
    }
}
