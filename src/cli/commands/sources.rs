//! Source listing command.

use console::style;

use crate::config::Settings;
use crate::sources::SourceRegistry;

/// Print registered sources, for one country or all of them.
pub fn cmd_sources(settings: &Settings, country: Option<&str>) -> anyhow::Result<()> {
    let registry = &settings.sources;
    let countries: Vec<&str> = match country {
        Some(country) => vec![country],
        None => registry.countries(),
    };

    for country in countries {
        let urls = registry.lookup(country);
        println!("\n{}", style(country).bold());
        if urls.is_empty() {
            println!("  {} No sources registered", style("!").yellow());
        }
        for url in urls {
            println!("  {}", url);
        }
    }

    Ok(())
}
