//! Demo command.

use anyhow::Context;
use four_d_are_core::{find_scenario, DomainTemplate};
use four_d_are_runtime::{AgentSettings, AttributionAgent};

/// Scenario shown by `demo` and used when no data is given.
pub const DEMO_SCENARIO: &str = "banking_retention";

pub async fn run() -> anyhow::Result<()> {
    let scenario = find_scenario(DEMO_SCENARIO)?;

    println!("4D-ARE Demo\n");
    println!("This demo shows how 4D-ARE traces causal chains through 4 dimensions.\n");
    println!("Demo Data Context:");
    println!("{}\n", serde_json::to_string_pretty(&scenario.context)?);
    println!("Query: {}\n", scenario.query);

    let settings = AgentSettings::from_env()?;
    if !settings.has_api_key() {
        println!("Note: Set OPENAI_API_KEY in .env to run actual analysis.");
        println!("\nExample .env file:");
        println!("  OPENAI_API_KEY=sk-your-key-here");
        println!("\nTo run this demo with real analysis:");
        println!("  four-d-are analyze \"Why is retention declining?\"");
        return Ok(());
    }

    let agent = AttributionAgent::with_settings(settings, DomainTemplate::preset(scenario.preset)?)
        .context("Failed to configure agent")?;
    let response = agent
        .analyze(scenario.query, &scenario.context)
        .await
        .context("Analysis failed")?;

    println!("=== 4D-ARE Analysis Result ===\n");
    println!("{response}");
    Ok(())
}
