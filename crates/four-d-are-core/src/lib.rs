//! # four-d-are-core
//!
//! Deterministic building blocks for 4D-ARE attribution analysis.
//!
//! This crate answers one question for an LLM agent: how should metrics be
//! framed so the model explains *why* a result moved, not just *what* moved?
//! It provides:
//! - The four causal [`Dimension`]s and their fixed [`AuthorityLevel`]s
//! - [`DomainTemplate`]: dimension field names and boundary rules for a domain
//! - [`DataContext`]: the metric values for one analysis request
//! - [`prompt`]: pure system/user prompt assembly
//! - [`connectors`]: the data-source capability interface
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: the same template always renders the same system prompt
//! 2. **No network calls**: all LLM traffic lives in `four-d-are-runtime`
//! 3. **Validated eagerly**: templates are checked at construction, not at use
//!
//! ## Example
//!
//! ```rust,ignore
//! use four_d_are_core::{prompt, DataContext, Dimension, DomainTemplate};
//!
//! let template = DomainTemplate::preset("banking")?;
//! let context = DataContext::new()
//!     .with_metric(Dimension::Results, "retention_rate", 0.56)
//!     .with_metric(Dimension::Longterm, "market_trend", "declining");
//!
//! let system = prompt::build_system_prompt(&template);
//! let user = prompt::build_user_prompt("Why is retention low?", &context);
//! ```

pub mod connectors;
pub mod context;
pub mod dimension;
pub mod error;
pub mod evaluation;
pub mod prompt;
pub mod template;

// Re-export main types at crate root
pub use connectors::{
    collect_context, demo_scenarios, find_scenario, ConnectorError, DataConnector,
    JsonFileConnector, Scenario, StaticConnector,
};
pub use context::{DataContext, MetricValue, Metrics};
pub use dimension::{AuthorityLevel, Dimension};
pub use error::ConfigurationError;
pub use evaluation::{judge_prompts, JudgeCase, JudgeParseError, JudgeScores};
pub use prompt::{build_system_prompt, build_user_prompt, render_data_context, PromptVariant};
pub use template::{DomainTemplate, DomainTemplateBuilder};
