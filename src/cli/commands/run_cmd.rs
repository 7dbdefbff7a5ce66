//! The analysis run command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::style;

use crate::analysis::{ModelClassifier, ModelExtractor};
use crate::config::Settings;
use crate::extract::TextExtractor;
use crate::http_client::HttpFetcher;
use crate::llm::LlmClient;
use crate::pipeline::{CountryPipeline, DocumentProcessor, RunOrchestrator, RunSummary};
use crate::storage::save_results;

/// Build the pipeline from settings.
pub fn build_orchestrator(
    settings: &Settings,
    show_progress: bool,
) -> anyhow::Result<RunOrchestrator> {
    let fetcher = HttpFetcher::with_options(
        Duration::from_secs(settings.request_timeout),
        &settings.user_agent,
    )
    .context("failed to build HTTP client")?;

    let llm =
        Arc::new(LlmClient::new(settings.llm.clone()).context("failed to build LLM client")?);
    let classifier = ModelClassifier::new(llm.clone(), settings.llm.classify_max_tokens);
    let extractor = ModelExtractor::new(llm, settings.llm.extract_max_tokens);

    let processor = DocumentProcessor::new(
        Arc::new(fetcher),
        Arc::new(classifier),
        Arc::new(extractor),
    )
    .with_text_extractor(TextExtractor::new().with_max_pdf_pages(settings.max_pdf_pages))
    .with_limits(settings.classify_max_chars, settings.extract_max_chars);

    let pipeline = CountryPipeline::new(Arc::new(settings.sources.clone()), Arc::new(processor))
        .with_progress(show_progress);
    Ok(RunOrchestrator::new(pipeline))
}

/// Process countries and write the results file.
pub async fn cmd_run(
    settings: &Settings,
    output: Option<PathBuf>,
    countries: Vec<String>,
    show_progress: bool,
) -> anyhow::Result<()> {
    let countries = if countries.is_empty() {
        settings.countries.clone()
    } else {
        countries
    };
    let output = output.unwrap_or_else(|| settings.output.clone());

    println!(
        "{} Processing {} with {} ({:?})",
        style("→").cyan(),
        countries.join(", "),
        settings.llm.model,
        settings.llm.provider
    );

    let orchestrator = build_orchestrator(settings, show_progress)?;
    let results = orchestrator.run(&countries).await;
    save_results(&output, &results).await?;

    let summary = RunSummary::from_results(&results);
    for result in results.iter().filter(|r| !r.is_ok()) {
        println!(
            "  {} {} {}",
            style("✗").red(),
            result.url,
            style(result.error_message().unwrap_or_default()).dim()
        );
    }
    println!(
        "{} {} documents: {} ok, {} failed, {} with projections ({} records)",
        style("✓").green(),
        summary.documents,
        summary.ok,
        summary.errors,
        summary.with_projections,
        summary.projections
    );
    println!("  Saved results to {}", style(output.display()).bold());

    Ok(())
}
