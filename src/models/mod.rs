//! Data models for tourproj.

mod document;
mod projection;

pub use document::{DocumentFormat, DocumentOutcome, DocumentReference, DocumentResult};
pub use projection::{
    Classification, ExtractionResult, Indicator, ProjectionRecord, ProjectionType, Unit,
};
