//! Failures that end processing of a single document.

use thiserror::Error;

use crate::extract::ParseError;
use crate::http_client::RetrievalError;

/// A document-terminal failure. Its message becomes the `error` field of the
/// document's result record.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
