//! The analysis pipeline: document processor, per-country loop, and run.
//!
//! Everything runs sequentially. Results come back in country order, then
//! registry URL order within each country, and one document's failure never
//! stops the rest.

mod country;
mod processor;
mod run;

pub use country::CountryPipeline;
pub use processor::{DocumentProcessor, DEFAULT_CLASSIFY_MAX_CHARS, DEFAULT_EXTRACT_MAX_CHARS};
pub use run::{RunOrchestrator, RunSummary};
