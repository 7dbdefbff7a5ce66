//! Tourism projection pipeline.
//!
//! For each country, document URLs from a [`sources::SourceRegistry`] are
//! fetched, reduced to plain text, classified by a language model, and, when
//! they hold future projections, mined for structured
//! [`models::ProjectionRecord`]s. Every document yields exactly one
//! [`models::DocumentResult`]; failures are recorded, never raised.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod testing;
pub mod utils;
