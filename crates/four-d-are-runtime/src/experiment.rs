//! Ablation experiments: the same case answered under each prompt variant,
//! optionally scored by an LLM judge, then summarised per variant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use four_d_are_core::{
    judge_prompts, ConfigurationError, DataContext, DomainTemplate, JudgeCase, JudgeParseError,
    JudgeScores, PromptVariant, Scenario,
};

use crate::config::AgentSettings;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

const JUDGE_TEMPERATURE: f32 = 0.3;
const JUDGE_MAX_TOKENS: u32 = 500;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("{variant} completion failed: {source}")]
    Agent {
        variant: PromptVariant,
        #[source]
        source: ProviderError,
    },

    #[error("Judge completion failed: {0}")]
    JudgeCall(#[source] ProviderError),

    #[error("Judge reply unusable: {0}")]
    JudgeParse(#[from] JudgeParseError),
}

/// One case to run through every variant.
#[derive(Debug, Clone)]
pub struct ExperimentCase {
    pub id: String,
    pub template: DomainTemplate,
    pub context: DataContext,
    pub judge: JudgeCase,
}

impl ExperimentCase {
    /// Build a case from a built-in demo scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ConfigurationError> {
        Ok(Self {
            id: scenario.id.to_string(),
            template: DomainTemplate::preset(scenario.preset)?,
            context: scenario.context.clone(),
            judge: JudgeCase::new(scenario.query, scenario.ground_truth),
        })
    }
}

/// One variant's answer.
#[derive(Debug, Clone, Serialize)]
pub struct VariantOutcome {
    pub variant: &'static str,
    pub response: String,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<JudgeScores>,
}

/// All variants' answers for one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case_id: String,
    pub run_at: DateTime<Utc>,
    pub outcomes: Vec<VariantOutcome>,
}

impl CaseReport {
    pub fn outcome(&self, variant: PromptVariant) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.variant == variant.name())
    }
}

/// A case that did not produce a report.
#[derive(Debug, Clone, Serialize)]
pub struct FailedCase {
    pub case_id: String,
    pub error: String,
}

/// Per-variant results across every judged case.
#[derive(Debug, Clone, Serialize)]
pub struct VariantSummary {
    pub variant: &'static str,
    /// Cases that carried scores for this variant
    pub judged: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<JudgeScores>,
}

/// Everything one batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cases: Vec<CaseReport>,
    pub failed: Vec<FailedCase>,
    pub summary: Vec<VariantSummary>,
}

impl ExperimentReport {
    fn summarise(cases: &[CaseReport]) -> Vec<VariantSummary> {
        PromptVariant::ALL
            .into_iter()
            .map(|variant| {
                let scores: Vec<&JudgeScores> = cases
                    .iter()
                    .filter_map(|case| case.outcome(variant))
                    .filter_map(|outcome| outcome.scores.as_ref())
                    .collect();
                VariantSummary {
                    variant: variant.name(),
                    judged: scores.len(),
                    mean: JudgeScores::average(scores),
                }
            })
            .collect()
    }

    pub fn summary(&self, variant: PromptVariant) -> Option<&VariantSummary> {
        self.summary.iter().find(|s| s.variant == variant.name())
    }

    /// Difference in mean total score against the naive baseline.
    pub fn gain_over_naive(&self, variant: PromptVariant) -> Option<f64> {
        let total = |v: PromptVariant| {
            self.summary(v)
                .and_then(|s| s.mean.as_ref())
                .map(JudgeScores::total)
        };
        Some(total(variant)? - total(PromptVariant::Naive)?)
    }
}

/// Runs cases against one provider. Each call is a single request.
#[derive(Clone)]
pub struct ExperimentRunner {
    provider: Arc<dyn LlmProvider>,
    agent_config: CompletionConfig,
    judge_config: CompletionConfig,
}

impl ExperimentRunner {
    /// The judge uses the agent's model at a lower temperature.
    pub fn new(provider: Arc<dyn LlmProvider>, agent_config: CompletionConfig) -> Self {
        let judge_config = CompletionConfig {
            temperature: JUDGE_TEMPERATURE,
            max_tokens: JUDGE_MAX_TOKENS,
            ..agent_config.clone()
        };
        Self {
            provider,
            agent_config,
            judge_config,
        }
    }

    /// Runner over the OpenAI-compatible endpoint in `settings`.
    pub fn with_settings(settings: AgentSettings) -> Result<Self, ConfigurationError> {
        let (provider, completion) = settings.connect()?;
        Ok(Self::new(Arc::new(provider), completion))
    }

    pub fn with_judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_config.model = model.into();
        self
    }

    /// Answer the case under one variant.
    pub async fn run_variant(
        &self,
        variant: PromptVariant,
        case: &ExperimentCase,
    ) -> Result<String, ExperimentError> {
        let (system, user) = variant.build(&case.template, &case.judge.query, &case.context);
        let response = self
            .provider
            .complete(
                vec![ChatMessage::system(system), ChatMessage::user(user)],
                &self.agent_config,
            )
            .await
            .map_err(|source| ExperimentError::Agent { variant, source })?;
        Ok(response.content)
    }

    /// Score one response.
    pub async fn judge(
        &self,
        case: &JudgeCase,
        response: &str,
    ) -> Result<JudgeScores, ExperimentError> {
        let (system, user) = judge_prompts(case, response);
        let reply = self
            .provider
            .complete(
                vec![ChatMessage::system(system), ChatMessage::user(user)],
                &self.judge_config,
            )
            .await
            .map_err(ExperimentError::JudgeCall)?;
        Ok(JudgeScores::parse(&reply.content)?)
    }

    async fn run_one(
        &self,
        variant: PromptVariant,
        case: &ExperimentCase,
        with_judge: bool,
    ) -> Result<VariantOutcome, ExperimentError> {
        let started = Instant::now();
        let response = self.run_variant(variant, case).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let scores = if with_judge {
            Some(self.judge(&case.judge, &response).await?)
        } else {
            None
        };

        tracing::info!(
            case = %case.id,
            variant = variant.name(),
            elapsed_ms,
            total_score = scores.as_ref().map(|s| s.total()),
            "Variant finished"
        );

        Ok(VariantOutcome {
            variant: variant.name(),
            response,
            elapsed_ms,
            scores,
        })
    }

    /// Run all three variants concurrently; the first failure fails the case.
    pub async fn run_case(
        &self,
        case: &ExperimentCase,
        with_judge: bool,
    ) -> Result<CaseReport, ExperimentError> {
        let run_at = Utc::now();
        let (naive, structure, full) = tokio::join!(
            self.run_one(PromptVariant::Naive, case, with_judge),
            self.run_one(PromptVariant::StructureOnly, case, with_judge),
            self.run_one(PromptVariant::FourDimensional, case, with_judge),
        );

        Ok(CaseReport {
            case_id: case.id.clone(),
            run_at,
            outcomes: vec![naive?, structure?, full?],
        })
    }

    /// Run every case in turn and summarise mean scores per variant.
    ///
    /// A failing case is recorded in [`ExperimentReport::failed`] and the
    /// batch carries on.
    pub async fn run_all(&self, cases: &[ExperimentCase], with_judge: bool) -> ExperimentReport {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(cases.len());
        let mut failed = Vec::new();

        for case in cases {
            match self.run_case(case, with_judge).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!(case = %case.id, error = %e, "Experiment case failed");
                    failed.push(FailedCase {
                        case_id: case.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            cases = cases.len(),
            failed = failed.len(),
            judged = with_judge,
            "Experiment finished"
        );

        ExperimentReport {
            started_at,
            finished_at: Utc::now(),
            summary: ExperimentReport::summarise(&reports),
            cases: reports,
            failed,
        }
    }
}
