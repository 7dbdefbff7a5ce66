//! Shared utility functions.
//!
//! - `text`: whitespace-collapsing truncation for model input

mod text;

pub use text::{shorten, TRUNCATION_MARKER};
