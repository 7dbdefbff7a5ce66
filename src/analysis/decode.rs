//! Tolerant decoding of model replies into typed results.
//!
//! Replies are expected to be a single JSON object. Markdown code fences and
//! prose around the object are tolerated; anything else falls back to the
//! undecodable value carrying the reply verbatim.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{Classification, ExtractionResult, ProjectionRecord, ProjectionType};

/// Strip a surrounding markdown code fence, if present.
pub fn strip_code_fence(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse the JSON object in a reply, looking past surrounding prose.
fn parse_object(content: &str) -> Option<serde_json::Map<String, Value>> {
    let cleaned = strip_code_fence(content);
    let parsed = serde_json::from_str::<Value>(cleaned).ok().or_else(|| {
        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&cleaned[start..=end]).ok()
    })?;

    match parsed {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ClassificationReply {
    contains_projections: bool,
    #[serde(default)]
    projection_type: Option<Value>,
    #[serde(default)]
    years_mentioned: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
}

fn parse_projection_type(value: Option<&str>) -> ProjectionType {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("arrivals") => ProjectionType::Arrivals,
        Some("revenue") => ProjectionType::Revenue,
        Some("both") => ProjectionType::Both,
        _ => ProjectionType::None,
    }
}

/// Years from a list of numbers or numeric strings; anything else is empty.
fn parse_years(value: Option<&Value>) -> Vec<i32> {
    let Some(Value::Array(years)) = value else {
        return Vec::new();
    };
    years
        .iter()
        .filter_map(|year| match year {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

/// Confidence from a number or numeric string, clamped to `[0, 1]`.
fn parse_confidence(value: Option<&Value>) -> f64 {
    let confidence = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Decode a classifier reply.
pub fn decode_classification(content: &str) -> Classification {
    let Some(object) = parse_object(content) else {
        debug!("Classifier reply is not a JSON object");
        return Classification::undecodable(content);
    };

    let reply: ClassificationReply = match serde_json::from_value(Value::Object(object)) {
        Ok(reply) => reply,
        Err(e) => {
            debug!(error = %e, "Classifier reply has unexpected shape");
            return Classification::undecodable(content);
        }
    };

    Classification {
        contains_projections: reply.contains_projections,
        projection_type: parse_projection_type(
            reply.projection_type.as_ref().and_then(Value::as_str),
        ),
        years_mentioned: parse_years(reply.years_mentioned.as_ref()),
        confidence: parse_confidence(reply.confidence.as_ref()),
        raw: None,
        error: None,
    }
}

/// Decode an extractor reply.
///
/// Missing or non-string `country`/`source_url` are filled from the document
/// being processed. Projection entries that do not match the record shape are
/// skipped individually.
pub fn decode_extraction(content: &str, country: &str, source_url: &str) -> ExtractionResult {
    let Some(object) = parse_object(content) else {
        debug!("Extractor reply is not a JSON object");
        return ExtractionResult::undecodable(country, source_url, content);
    };

    let text_field = |key: &str, fallback: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    let mut result = ExtractionResult::new(
        text_field("country", country),
        text_field("source_url", source_url),
    );

    match object.get("projections") {
        Some(Value::Array(entries)) => {
            for entry in entries {
                match serde_json::from_value::<ProjectionRecord>(entry.clone()) {
                    Ok(record) => result.projections.push(record),
                    Err(e) => debug!(error = %e, "Skipping malformed projection entry"),
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => {
            debug!("Extractor reply has non-list projections");
            return ExtractionResult::undecodable(country, source_url, content);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Indicator, Unit};

    #[test]
    fn test_plain_classification() {
        let c = decode_classification(
            r#"{"contains_projections": true, "projection_type": "arrivals", "years_mentioned": [2025, 2026], "confidence": 0.9}"#,
        );
        assert!(c.is_decoded());
        assert!(c.contains_projections);
        assert_eq!(c.projection_type, ProjectionType::Arrivals);
        assert_eq!(c.years_mentioned, vec![2025, 2026]);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn test_fenced_classification() {
        let c = decode_classification(
            "```json\n{\"contains_projections\": false, \"projection_type\": \"none\", \"years_mentioned\": [], \"confidence\": 0.4}\n```",
        );
        assert!(c.is_decoded());
        assert!(!c.contains_projections);
        assert_eq!(c.confidence, 0.4);
    }

    #[test]
    fn test_classification_with_prose() {
        let c = decode_classification(
            "Sure! Here is the result: {\"contains_projections\": true, \"projection_type\": \"both\", \"confidence\": 0.7} Hope that helps.",
        );
        assert!(c.is_decoded());
        assert_eq!(c.projection_type, ProjectionType::Both);
        assert!(c.years_mentioned.is_empty());
    }

    #[test]
    fn test_non_json_classification_keeps_raw() {
        let c = decode_classification("I think it does.");
        assert!(!c.contains_projections);
        assert_eq!(c.confidence, 0.0);
        assert_eq!(c.raw.as_deref(), Some("I think it does."));
    }

    #[test]
    fn test_classification_missing_flag_is_undecodable() {
        let c = decode_classification(r#"{"projection_type": "arrivals"}"#);
        assert!(!c.is_decoded());
        assert!(!c.contains_projections);
    }

    #[test]
    fn test_confidence_clamped_and_lenient_fields() {
        let c = decode_classification(
            r#"{"contains_projections": true, "projection_type": "Visitors", "years_mentioned": ["2030", 2031, "soon"], "confidence": 7}"#,
        );
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.projection_type, ProjectionType::None);
        assert_eq!(c.years_mentioned, vec![2030, 2031]);
    }

    #[test]
    fn test_null_years_and_string_confidence() {
        let c = decode_classification(
            r#"{"contains_projections": true, "projection_type": "revenue", "years_mentioned": null, "confidence": "0.8"}"#,
        );
        assert!(c.is_decoded());
        assert!(c.contains_projections);
        assert_eq!(c.projection_type, ProjectionType::Revenue);
        assert!(c.years_mentioned.is_empty());
        assert_eq!(c.confidence, 0.8);
    }

    #[test]
    fn test_odd_field_types_fall_back_per_field() {
        let c = decode_classification(
            r#"{"contains_projections": true, "projection_type": null, "years_mentioned": "2030", "confidence": "high"}"#,
        );
        assert!(c.is_decoded());
        assert!(c.contains_projections);
        assert_eq!(c.projection_type, ProjectionType::None);
        assert!(c.years_mentioned.is_empty());
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_extraction_fills_identity_and_skips_bad_entries() {
        let reply = r#"{
            "projections": [
                {"indicator": "arrivals", "year": 2026, "value": 90000000, "unit": "visitors"},
                {"indicator": "arrivals", "year": "next year", "value": 1, "unit": "visitors"},
                {"indicator": "revenue", "year": 2027, "value": 1.5e11, "unit": "USD"}
            ]
        }"#;
        let result = decode_extraction(reply, "Spain", "https://example.com/a");
        assert_eq!(result.country, "Spain");
        assert_eq!(result.source_url, "https://example.com/a");
        assert_eq!(
            result.projections,
            vec![
                ProjectionRecord::new(Indicator::Arrivals, 2026, 90_000_000.0, Unit::Visitors),
                ProjectionRecord::new(Indicator::Revenue, 2027, 1.5e11, Unit::Usd),
            ]
        );
        assert!(result.raw.is_none());
    }

    #[test]
    fn test_extraction_keeps_model_identity() {
        let reply = "```\n{\"country\": \"United States\", \"source_url\": \"https://x\", \"projections\": []}\n```";
        let result = decode_extraction(reply, "USA", "https://y");
        assert_eq!(result.country, "United States");
        assert_eq!(result.source_url, "https://x");
        assert!(result.projections.is_empty());
    }

    #[test]
    fn test_non_json_extraction_keeps_raw() {
        let result = decode_extraction("no numbers here", "USA", "https://y");
        assert!(result.projections.is_empty());
        assert_eq!(result.raw.as_deref(), Some("no numbers here"));
        assert_eq!(result.country, "USA");
    }

    #[test]
    fn test_array_reply_is_undecodable() {
        let result = decode_extraction("[1, 2, 3]", "USA", "https://y");
        assert!(result.raw.is_some());
    }
}
