//! Analyze command.

use anyhow::Context;
use four_d_are_runtime::{AgentSettings, AttributionAgent};

use super::{resolve_inputs, InputArgs};

pub async fn run(query: &str, input: &InputArgs) -> anyhow::Result<()> {
    let (template, context) = resolve_inputs(input)?;

    let settings = AgentSettings::from_env()?;
    let agent = AttributionAgent::with_settings(settings, template)
        .context("Failed to configure agent")?;

    println!("Query: {query}");
    println!("Domain: {}\n", agent.template().domain());

    let response = agent
        .analyze(query, &context)
        .await
        .context("Analysis failed")?;

    println!("{response}");
    Ok(())
}
