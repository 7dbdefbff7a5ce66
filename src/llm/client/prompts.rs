//! Default LLM prompts for document analysis.

/// System prompt for deciding whether a document holds future projections.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are a JSON-only classifier for tourism documents.

Task:
Given some text from a document, decide if it contains
quantitative FUTURE projections of tourism (visitor arrivals and/or tourism revenue).

You MUST respond with a single JSON object and NOTHING else.

JSON schema:
{
  "contains_projections": boolean,
  "projection_type": "arrivals" | "revenue" | "both" | "none",
  "years_mentioned": [int, ...],
  "confidence": float
}"#;

/// System prompt for pulling projection records out of a document.
pub const EXTRACTOR_SYSTEM_PROMPT: &str = r#"You are a data extraction assistant.
Your job is to extract quantitative FUTURE tourism projections from the document.

Return ONLY a VALID JSON object.

JSON schema:
{
  "country": string,
  "source_url": string,
  "projections": [
    {
      "indicator": "arrivals" | "revenue",
      "year": int,
      "value": number,
      "unit": "visitors" | "USD" | "EUR" | "local_currency"
    }
  ]
}

IMPORTANT RULES:
- Only extract *future projections*, not historical numbers.
- If you are unsure, include an empty list.
- Do NOT include explanations."#;

/// System prompt for the connectivity check.
pub const CHECK_SYSTEM_PROMPT: &str =
    "You MUST respond with EXACTLY what the user requests - no extra text, no explanations.";

/// User prompt for the connectivity check.
pub const CHECK_PROMPT: &str = "Respond with EXACTLY: tourism agent OK";
