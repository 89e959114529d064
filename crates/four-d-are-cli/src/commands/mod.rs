pub mod analyze;
pub mod demo;
pub mod experiment;
pub mod init;
pub mod prompt;
pub mod scenarios;

use anyhow::Context;
use clap::Args;
use four_d_are_core::{
    collect_context, find_scenario, DataContext, DomainTemplate, JsonFileConnector,
};
use std::path::PathBuf;

/// Where the template and the data context come from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON file with {results, process, support, longterm}
    #[arg(short, long, conflicts_with = "scenario")]
    pub data: Option<PathBuf>,

    /// Preset template: banking, healthcare, ecommerce
    #[arg(short, long, conflicts_with = "template_file")]
    pub template: Option<String>,

    /// YAML or JSON template file
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    /// Use a built-in demo scenario's data (see `scenarios`)
    #[arg(short, long)]
    pub scenario: Option<String>,
}

/// Resolve the template and data context for a command.
///
/// Without `--data` or `--scenario` the banking retention demo data is used.
/// Without a template option, the scenario's preset (or banking) is used.
pub fn resolve_inputs(args: &InputArgs) -> anyhow::Result<(DomainTemplate, DataContext)> {
    let scenario = match &args.scenario {
        Some(id) => Some(find_scenario(id)?),
        None => None,
    };

    let template = if let Some(path) = &args.template_file {
        DomainTemplate::from_file(path)
            .with_context(|| format!("Failed to load template from {}", path.display()))?
    } else {
        let name = args
            .template
            .as_deref()
            .or(scenario.map(|s| s.preset))
            .unwrap_or("banking");
        DomainTemplate::preset(name)?
    };

    let context = if let Some(path) = &args.data {
        let connector = JsonFileConnector::open(path)
            .with_context(|| format!("Failed to load data context from {}", path.display()))?;
        collect_context(&connector)?
    } else if let Some(scenario) = scenario {
        scenario.context.clone()
    } else {
        eprintln!("Using demo data context. Use --data to provide your own.\n");
        find_scenario(demo::DEMO_SCENARIO)?.context.clone()
    };

    Ok((template, context))
}
