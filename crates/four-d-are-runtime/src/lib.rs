//! # four-d-are-runtime
//!
//! The networked half of 4D-ARE: an [`AttributionAgent`] that turns a
//! [`DomainTemplate`](four_d_are_core::DomainTemplate) and a
//! [`DataContext`](four_d_are_core::DataContext) into one chat-completion
//! request against an OpenAI-compatible endpoint.
//!
//! Prompt assembly is deterministic and lives in `four-d-are-core`; this crate
//! only adds configuration, credentials and the HTTP call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use four_d_are_core::{DataContext, Dimension, DomainTemplate};
//! use four_d_are_runtime::{AgentSettings, AttributionAgent};
//!
//! let settings = AgentSettings::from_env()?;
//! let agent = AttributionAgent::with_settings(settings, DomainTemplate::preset("healthcare")?)?;
//!
//! let ctx = DataContext::new().with_metric(Dimension::Results, "readmission_rate_30d", 0.18);
//! let answer = agent.analyze("Why are readmissions up?", &ctx).await?;
//! ```

pub mod agent;
pub mod config;
pub mod experiment;
pub mod providers;

pub use agent::{AnalysisError, AttributionAgent};
pub use config::AgentSettings;
pub use experiment::{
    CaseReport, ExperimentCase, ExperimentError, ExperimentReport, ExperimentRunner, FailedCase,
    VariantOutcome, VariantSummary,
};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, OpenAiProvider, ProviderError, TokenUsage,
};
