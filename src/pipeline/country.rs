//! Runs every registered document of one country through the processor.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::DocumentProcessor;
use crate::models::{DocumentReference, DocumentResult};
use crate::sources::SourceRegistry;

/// Sequential per-country loop over the registry's URLs.
pub struct CountryPipeline {
    registry: Arc<dyn SourceRegistry>,
    processor: Arc<DocumentProcessor>,
    show_progress: bool,
}

impl CountryPipeline {
    pub fn new(registry: Arc<dyn SourceRegistry>, processor: Arc<DocumentProcessor>) -> Self {
        Self {
            registry,
            processor,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while documents are processed.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, total: usize, country: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_message(format!("Processing {}", country));
        bar
    }

    /// Process each URL for `country` in registry order, one at a time.
    pub async fn run(&self, country: &str) -> Vec<DocumentResult> {
        let urls = self.registry.lookup(country);
        if urls.is_empty() {
            info!(country, "No sources registered; nothing to process");
            return Vec::new();
        }

        info!(country, documents = urls.len(), "Processing country");
        let progress = self.progress_bar(urls.len(), country);

        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            progress.set_message(format!("Processing {}: {}", country, url));
            let reference = DocumentReference::new(country, url);
            results.push(self.processor.process(&reference).await);
            progress.inc(1);
        }
        progress.finish_and_clear();

        results
    }
}
