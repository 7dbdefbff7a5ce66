//! Persisting run results to disk.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::DocumentResult;

/// Default output file for a run.
pub const DEFAULT_OUTPUT_FILE: &str = "classification_results.json";

/// Render run results as indented UTF-8 JSON.
pub fn render_results(results: &[DocumentResult]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(results).context("failed to serialize run results")
}

/// Write the full run result to `path`, replacing any existing file.
pub async fn save_results(path: &Path, results: &[DocumentResult]) -> anyhow::Result<()> {
    let json = render_results(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), documents = results.len(), "Saved run results");
    Ok(())
}
