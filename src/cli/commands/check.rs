//! LLM connectivity check.

use console::style;

use crate::config::Settings;
use crate::llm::LlmClient;

/// Send a fixed prompt to the configured model and print its reply.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let config = &settings.llm;
    println!(
        "{} Checking {:?} model {} at {}",
        style("→").cyan(),
        config.provider,
        style(&config.model).bold(),
        config.endpoint
    );

    let client = LlmClient::new(config.clone())?;
    match client.ping().await {
        Ok(reply) => {
            println!("{} Model replied: {}", style("✓").green(), reply);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
