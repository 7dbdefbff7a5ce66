//! Source registry: candidate document URLs per country.

use std::collections::BTreeMap;

/// Resolves a country to the ordered list of document URLs worth analysing.
///
/// Unknown countries resolve to an empty list.
pub trait SourceRegistry: Send + Sync {
    fn lookup(&self, country: &str) -> Vec<String>;
}

/// Built-in sources, keyed by exact country name.
const BUILTIN_SOURCES: &[(&str, &[&str])] = &[
    (
        "USA",
        &["https://www.ustravel.org/research/travel-forecasts"],
    ),
    (
        "Spain",
        &["https://www.tourism-review.com/increasing-numbers-of-international-travelers-to-turn-spain-in-destination-no-1-news14657"],
    ),
];

/// In-memory registry backed by a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticSourceRegistry {
    sources: BTreeMap<String, Vec<String>>,
}

impl StaticSourceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in source table.
    pub fn builtin() -> Self {
        let sources = BUILTIN_SOURCES
            .iter()
            .map(|(country, urls)| {
                (
                    country.to_string(),
                    urls.iter().map(|url| url.to_string()).collect(),
                )
            })
            .collect();
        Self { sources }
    }

    /// Add or replace the URL list for one country.
    pub fn with_sources<I, S>(mut self, country: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources
            .insert(country.into(), urls.into_iter().map(Into::into).collect());
        self
    }

    /// Merge a table over this one; entries in `other` replace existing ones.
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, Vec<String>)>) {
        self.sources.extend(other);
    }

    /// Countries with at least one entry, in name order.
    pub fn countries(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }
}

impl SourceRegistry for StaticSourceRegistry {
    fn lookup(&self, country: &str) -> Vec<String> {
        self.sources.get(country).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let registry = StaticSourceRegistry::builtin();
        assert_eq!(
            registry.lookup("USA"),
            vec!["https://www.ustravel.org/research/travel-forecasts"]
        );
        assert_eq!(registry.lookup("Spain").len(), 1);
        assert_eq!(registry.countries(), vec!["Spain", "USA"]);
    }

    #[test]
    fn test_unknown_country_is_empty() {
        let registry = StaticSourceRegistry::builtin();
        assert!(registry.lookup("Atlantis").is_empty());
        assert!(registry.lookup("usa").is_empty());
    }

    #[test]
    fn test_overrides_keep_order() {
        let mut registry =
            StaticSourceRegistry::builtin().with_sources("France", ["https://b", "https://a"]);
        registry.extend([("USA".to_string(), vec!["https://override".to_string()])]);

        assert_eq!(registry.lookup("France"), vec!["https://b", "https://a"]);
        assert_eq!(registry.lookup("USA"), vec!["https://override"]);
    }
}
