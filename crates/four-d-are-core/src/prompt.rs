//! Prompt assembly.
//!
//! The system prompt is rendered from a [`DomainTemplate`] alone and the user
//! prompt from the query plus a [`DataContext`]. Both are pure string
//! rendering: equal inputs always produce byte-identical output.

use crate::context::DataContext;
use crate::dimension::Dimension;
use crate::template::DomainTemplate;

/// Rendered in place of an empty dimension block.
pub const NO_DATA_PLACEHOLDER: &str = "(no data available)";

const CORE_PRINCIPLE: &str = r#"## CORE PRINCIPLE
Every performance gap has a causal chain. Your job is to TRACE this chain through 4 dimensions:
Results -> Process -> Support -> Long-term (Environment)"#;

const TRACING_PROTOCOL: &str = r#"## ATTRIBUTION TRACING PROTOCOL
When Results show gaps:
1. First DISPLAY the result gap (D_R)
2. Then TRACE to Process factors (D_P) - which operational behaviors caused this?
3. Then TRACE to Support factors (D_S) - what resource constraints contributed?
4. Finally CONTEXTUALIZE with Long-term factors (D_L) - what environmental factors set the stage?"#;

const BOUNDARY_RULES: &str = r#"- Use HEDGED language: "indicates", "suggests", "may reflect", "warrants review"
- ALWAYS distinguish observation from inference
- If data is missing, explicitly acknowledge it"#;

const SYNTHESIS_HEADER: &str = "【综合建议】(Synthesis - actionable next steps within your authority)";

const TRACE_INSTRUCTION: &str = "Provide attribution-complete analysis following the 4D framework.\n\
Trace the causal chain from results through process to support to long-term factors.";

/// Render the framework system prompt for a domain.
pub fn build_system_prompt(template: &DomainTemplate) -> String {
    let mut sections = Vec::with_capacity(8);

    sections.push(format!(
        "You are a Performance Attribution Agent operating under the 4D-ARE framework.\nDomain: {}",
        template.domain()
    ));
    sections.push(CORE_PRINCIPLE.to_string());

    let mut framework = vec!["## DIMENSIONAL FRAMEWORK".to_string()];
    for dimension in Dimension::ALL {
        framework.push(dimension_block(template, dimension));
    }
    sections.push(framework.join("\n\n"));

    sections.push(TRACING_PROTOCOL.to_string());

    let mut boundaries = vec!["## BOUNDARY CONSTRAINTS (CRITICAL)".to_string()];
    boundaries.extend(template.boundaries().iter().map(|b| format!("- {b}")));
    boundaries.push(BOUNDARY_RULES.to_string());
    sections.push(boundaries.join("\n"));

    sections.push(response_format());

    sections.push(format!(
        "## OUTPUT LANGUAGE\nWrite the entire response in {}.",
        template.language()
    ));

    let prompt = sections.join("\n\n");
    tracing::debug!(
        domain = template.domain(),
        prompt_len = prompt.len(),
        "Assembled system prompt"
    );
    prompt
}

fn dimension_block(template: &DomainTemplate, dimension: Dimension) -> String {
    let authority = dimension.authority();
    let mut lines = vec![
        format!(
            "### {} {} (Authority: {})",
            dimension.code(),
            dimension.label(),
            authority.label()
        ),
        format!("- What: {}", dimension.description()),
    ];
    lines.extend(authority.guidance().iter().map(|g| format!("- {g}")));
    lines.push(format!("- Fields: {}", template.fields(dimension).join(", ")));
    lines.join("\n")
}

fn response_format() -> String {
    let mut lines = vec![
        "## RESPONSE FORMAT".to_string(),
        "Structure your response with clear section headers:".to_string(),
    ];
    lines.extend(Dimension::ALL.iter().map(|d| d.response_header().to_string()));
    lines.push(SYNTHESIS_HEADER.to_string());
    lines.join("\n")
}

/// Render the user prompt: the query, the tracing instruction, and every
/// metric of `ctx` grouped by dimension.
pub fn build_user_prompt(query: &str, ctx: &DataContext) -> String {
    let prompt = format!(
        "Query: {query}\n\n{TRACE_INSTRUCTION}\n\n{}",
        render_data_context(ctx)
    );
    tracing::debug!(
        prompt_len = prompt.len(),
        metrics = ctx.metric_count(),
        "Assembled user prompt"
    );
    prompt
}

/// Render the `DATA CONTEXT` section.
pub fn render_data_context(ctx: &DataContext) -> String {
    let mut lines = vec!["DATA CONTEXT:".to_string()];
    for dimension in Dimension::ALL {
        lines.push(format!("[{} {}]", dimension.code(), dimension.label()));
        let metrics = ctx.dimension(dimension);
        if metrics.is_empty() {
            lines.push(format!("  {NO_DATA_PLACEHOLDER}"));
        }
        for (key, value) in metrics {
            lines.push(format!("  - {key}: {value}"));
        }
    }
    lines.join("\n")
}

/// Prompt strategies compared in ablation experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptVariant {
    /// Generic analyst prompt with no structure.
    Naive,
    /// Four section headers, no authority rules or boundaries.
    StructureOnly,
    /// The full framework prompt.
    FourDimensional,
}

impl PromptVariant {
    pub const ALL: [PromptVariant; 3] = [
        PromptVariant::Naive,
        PromptVariant::StructureOnly,
        PromptVariant::FourDimensional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptVariant::Naive => "naive",
            PromptVariant::StructureOnly => "structure",
            PromptVariant::FourDimensional => "4d-are",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Build `(system, user)` prompts for this variant.
    pub fn build(self, template: &DomainTemplate, query: &str, ctx: &DataContext) -> (String, String) {
        match self {
            PromptVariant::Naive => (
                "You are a helpful data analyst assistant.\n\
                 Analyze the provided data and answer the user's question.\n\
                 Think step-by-step and provide a clear analysis."
                    .to_string(),
                format!(
                    "Question: {query}\n\nPlease analyze the data and explain your findings.\n\n{}",
                    render_data_context(ctx)
                ),
            ),
            PromptVariant::StructureOnly => {
                let headers: Vec<String> = Dimension::ALL
                    .iter()
                    .map(|d| format!("【{}】 - {}", d.label(), d.description()))
                    .collect();
                (
                    format!(
                        "You are a performance analyst. Please organize your analysis using these four dimensions:\n\n\
                         ## Response Structure\n{}\n\n\
                         Analyze the data and provide insights for each dimension.",
                        headers.join("\n")
                    ),
                    format!(
                        "Question: {query}\n\nPlease analyze using the four-dimensional structure above.\n\n{}",
                        render_data_context(ctx)
                    ),
                )
            }
            PromptVariant::FourDimensional => {
                (build_system_prompt(template), build_user_prompt(query, ctx))
            }
        }
    }
}

impl std::fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
