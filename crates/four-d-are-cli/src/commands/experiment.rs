//! Experiment command: every demo scenario under every prompt variant.

use anyhow::Context;
use four_d_are_core::{demo_scenarios, PromptVariant};
use four_d_are_runtime::{AgentSettings, ExperimentCase, ExperimentReport, ExperimentRunner};
use std::fs;
use std::path::Path;

pub async fn run(with_judge: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let cases = demo_scenarios()
        .iter()
        .map(ExperimentCase::from_scenario)
        .collect::<Result<Vec<_>, _>>()?;

    let runner = ExperimentRunner::with_settings(AgentSettings::from_env()?)
        .context("Failed to configure experiment runner")?;

    println!(
        "Running {} scenarios x {} variants{}\n",
        cases.len(),
        PromptVariant::ALL.len(),
        if with_judge { " with judge scoring" } else { "" }
    );
    let report = runner.run_all(&cases, with_judge).await;

    print!("{}", render_summary(&report));

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nReport saved to {}", path.display());
    }

    anyhow::ensure!(
        !report.cases.is_empty(),
        "All {} experiment cases failed",
        report.failed.len()
    );
    Ok(())
}

fn render_summary(report: &ExperimentReport) -> String {
    let mut out = format!(
        "Completed {} cases, {} failed\n",
        report.cases.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        out.push_str(&format!("  - {}: {}\n", failure.case_id, failure.error));
    }

    let judged = report.summary.iter().any(|s| s.mean.is_some());
    if !judged {
        return out;
    }

    out.push_str(&format!(
        "\n{:<14} {:>7} {:>10} {:>8} {:>9} {:>7} {:>9}\n",
        "Variant", "Causal", "Separation", "Action", "Boundary", "Total", "vs naive"
    ));
    for variant in PromptVariant::ALL {
        let Some(mean) = report.summary(variant).and_then(|s| s.mean.as_ref()) else {
            continue;
        };
        let gain = report
            .gain_over_naive(variant)
            .map(|g| format!("{g:+.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<14} {:>7.2} {:>10.2} {:>8.2} {:>9.2} {:>7.2} {:>9}\n",
            variant.name(),
            mean.causal_chain_completeness,
            mean.dimensional_separation,
            mean.actionability,
            mean.boundary_respect,
            mean.total(),
            gain
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use four_d_are_core::JudgeScores;
    use four_d_are_runtime::{FailedCase, VariantSummary};

    fn scores(total_each: f64) -> JudgeScores {
        JudgeScores {
            causal_chain_completeness: total_each,
            dimensional_separation: total_each,
            actionability: total_each,
            boundary_respect: total_each,
            reasoning: String::new(),
        }
    }

    fn report(summary: Vec<VariantSummary>) -> ExperimentReport {
        ExperimentReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            cases: Vec::new(),
            failed: vec![FailedCase {
                case_id: "banking_aum".to_string(),
                error: "naive completion failed".to_string(),
            }],
            summary,
        }
    }

    #[test]
    fn test_summary_table_shows_gain_over_naive() {
        let summary = PromptVariant::ALL
            .into_iter()
            .zip([2.0, 3.0, 4.5])
            .map(|(variant, score)| VariantSummary {
                variant: variant.name(),
                judged: 2,
                mean: Some(scores(score)),
            })
            .collect();
        let text = render_summary(&report(summary));

        assert!(text.contains("banking_aum: naive completion failed"));
        let row = text.lines().find(|l| l.starts_with("4d-are")).unwrap();
        assert!(row.contains("18.00"));
        assert!(row.ends_with("+10.00"));
    }

    #[test]
    fn test_unjudged_summary_has_no_table() {
        let summary = PromptVariant::ALL
            .into_iter()
            .map(|variant| VariantSummary {
                variant: variant.name(),
                judged: 0,
                mean: None,
            })
            .collect();
        let text = render_summary(&report(summary));
        assert!(!text.contains("Variant"));
    }
}
