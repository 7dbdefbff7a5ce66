//! Multi-country run and its summary.

use serde::Serialize;
use tracing::info;

use super::CountryPipeline;
use crate::models::DocumentResult;

/// Drives the country pipeline over a list of countries.
pub struct RunOrchestrator {
    pipeline: CountryPipeline,
}

impl RunOrchestrator {
    pub fn new(pipeline: CountryPipeline) -> Self {
        Self { pipeline }
    }

    /// Process every country in order and concatenate the results.
    pub async fn run(&self, countries: &[String]) -> Vec<DocumentResult> {
        let mut results = Vec::new();
        for country in countries {
            let country_results = self.pipeline.run(country).await;
            info!(
                country = %country,
                documents = country_results.len(),
                "Country complete"
            );
            results.extend(country_results);
        }

        let summary = RunSummary::from_results(&results);
        info!(
            countries = countries.len(),
            documents = summary.documents,
            ok = summary.ok,
            errors = summary.errors,
            with_projections = summary.with_projections,
            "Run complete"
        );
        results
    }
}

/// Counts over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents: usize,
    pub ok: usize,
    pub errors: usize,
    /// Documents classified as containing projections.
    pub with_projections: usize,
    /// Projection records across all documents.
    pub projections: usize,
}

impl RunSummary {
    pub fn from_results(results: &[DocumentResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.documents += 1;
            if result.is_ok() {
                summary.ok += 1;
            } else {
                summary.errors += 1;
            }
            if result
                .classification()
                .is_some_and(|c| c.contains_projections)
            {
                summary.with_projections += 1;
            }
            summary.projections += result.extracted().map_or(0, |e| e.projections.len());
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Classification, DocumentReference, ExtractionResult, Indicator, ProjectionRecord, Unit,
    };

    #[test]
    fn test_summary_counts() {
        let a = DocumentReference::new("USA", "https://a");
        let b = DocumentReference::new("USA", "https://b");
        let c = DocumentReference::new("Spain", "https://c");
        let positive = Classification {
            contains_projections: true,
            ..Classification::default()
        };
        let extraction = ExtractionResult::new("USA", "https://a").with_projection(
            ProjectionRecord::new(Indicator::Arrivals, 2026, 1.0, Unit::Visitors),
        );

        let results = vec![
            DocumentResult::ok(&a, positive, Some(extraction)),
            DocumentResult::ok(&b, Classification::default(), None),
            DocumentResult::error(&c, "timed out fetching https://c"),
        ];

        assert_eq!(
            RunSummary::from_results(&results),
            RunSummary {
                documents: 3,
                ok: 2,
                errors: 1,
                with_projections: 1,
                projections: 1,
            }
        );
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(RunSummary::from_results(&[]), RunSummary::default());
    }
}
