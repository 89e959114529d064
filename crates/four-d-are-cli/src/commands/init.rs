//! Init command: scaffold a project directory.

use anyhow::Context;
use four_d_are_core::{DataContext, Dimension};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_EXAMPLE: &str = "# 4D-ARE Configuration
OPENAI_API_KEY=sk-your-key-here
# OPENAI_BASE_URL=https://api.openai.com/v1
# MODEL_AGENT=gpt-4o
# FOUR_D_ARE_TIMEOUT=60s
";

fn example_context() -> DataContext {
    DataContext::new()
        .with_metric(Dimension::Results, "primary_metric", 0.62)
        .with_metric(Dimension::Results, "secondary_metric", 0.75)
        .with_metric(Dimension::Process, "visit_frequency", 2.1)
        .with_metric(Dimension::Process, "cross_sell_rate", 0.28)
        .with_metric(Dimension::Process, "quality_score", 0.82)
        .with_metric(Dimension::Support, "staffing_ratio", 0.68)
        .with_metric(Dimension::Support, "training_completion", 0.91)
        .with_metric(Dimension::Longterm, "market_trend", "declining")
        .with_metric(Dimension::Longterm, "competitor_entries", 3)
}

/// Write the example files under `output_dir`, skipping any that exist.
///
/// Returns the files actually created.
pub fn run(output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let data_dir = output_dir.join("data");
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let mut created = Vec::new();

    let data_file = data_dir.join("example_context.json");
    if !data_file.exists() {
        let json = serde_json::to_string_pretty(&example_context())?;
        fs::write(&data_file, json + "\n")
            .with_context(|| format!("Failed to write {}", data_file.display()))?;
        created.push(data_file.clone());
    }

    let env_example = output_dir.join(".env.example");
    if !env_example.exists() {
        fs::write(&env_example, ENV_EXAMPLE)
            .with_context(|| format!("Failed to write {}", env_example.display()))?;
        created.push(env_example.clone());
    }

    println!("Initialized 4D-ARE project in {}", output_dir.display());
    if created.is_empty() {
        println!("\nAll files already exist; nothing written.");
    } else {
        println!("\nCreated files:");
        for path in &created {
            println!("  - {}", path.display());
        }
    }
    println!("\nNext steps:");
    println!("  1. Copy .env.example to .env and add your API key");
    println!("  2. Edit {} with your metrics", data_file.display());
    println!("  3. Run: four-d-are analyze \"Your question\" --data data/example_context.json");

    Ok(created)
}
