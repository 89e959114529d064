//! LLM-as-judge scoring for prompt-variant experiments.
//!
//! The judge sees the scenario's ground-truth causal chain and one agent
//! response, and replies with four 0-5 scores. Replies are parsed strictly:
//! a reply without a well-formed, in-range score object is an error, never a
//! row of zeros.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest score on each criterion.
pub const MAX_SCORE: f64 = 5.0;

const JUDGE_SYSTEM_PROMPT: &str = r#"You are an expert evaluator assessing AI agent responses for a performance attribution task.

Compare the Agent's response against the Ground Truth and evaluate on a 0-5 scale.

EVALUATION CRITERIA (each scored 0-5):

1. CAUSAL_CHAIN_COMPLETENESS (0-5)
   How completely did the agent trace the causal chain from Results -> Process -> Support -> Long-term?
   - 5: Traced the FULL chain explicitly, identifying how each dimension contributes to the next
   - 4: Covered all dimensions but chain linkage was implicit
   - 3: Covered 3 dimensions with some causal reasoning
   - 2: Covered 2 dimensions, limited causal connection
   - 1: Mentioned multiple factors but no causal chain
   - 0: Only listed surface-level metrics

2. DIMENSIONAL_SEPARATION (0-5)
   How clearly did the agent SEPARATE different types of factors?
   - 5: Explicit labeled sections for each dimension (Results/Process/Support/Long-term)
   - 4: Clear paragraphs for each dimension but no explicit labels
   - 3: Some grouping by dimension, but mixed in places
   - 2: Minimal separation, factors jumbled together
   - 1: No attempt to separate dimensions
   - 0: Completely unstructured response

3. ACTIONABILITY (0-5)
   How actionable and specific were the recommendations?
   - 5: Specific, concrete actions with clear ownership and scope
   - 4: Specific actions but scope/ownership unclear
   - 3: General recommendations with some specificity
   - 2: Vague suggestions without concrete steps
   - 1: Only observations, no recommendations
   - 0: No useful output

4. BOUNDARY_RESPECT (0-5)
   How well did the agent respect authority boundaries?
   - 5: Perfect hedging, clear scope limits, distinguished observation from inference
   - 4: Good hedging, minor overreach in language
   - 3: Mostly appropriate but some overconfident claims
   - 2: Several boundary violations or overconfident recommendations
   - 1: Direct personnel/strategic recommendations without hedging
   - 0: Completely ignored boundaries

OUTPUT FORMAT (strict JSON):
{
  "causal_chain_completeness": 0-5,
  "dimensional_separation": 0-5,
  "actionability": 0-5,
  "boundary_respect": 0-5,
  "reasoning": "Brief explanation of scores"
}"#;

lazy_static! {
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```(?:json)?\s*\n(.*?)```").expect("fenced JSON pattern is valid");
}

/// Judge reply could not be turned into scores.
#[derive(Error, Debug)]
pub enum JudgeParseError {
    #[error("No JSON object found in judge response (length={0})")]
    NoJson(usize),

    #[error("Judge response is not a score object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Score {criterion} = {value} is outside 0-5")]
    OutOfRange { criterion: &'static str, value: f64 },
}

/// Scenario facts the judge compares a response against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeCase {
    pub query: String,
    pub ground_truth: String,
    #[serde(default)]
    pub boundary_trap: Option<String>,
    #[serde(default)]
    pub false_lead: Option<String>,
}

impl JudgeCase {
    pub fn new(query: impl Into<String>, ground_truth: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ground_truth: ground_truth.into(),
            boundary_trap: None,
            false_lead: None,
        }
    }

    pub fn with_boundary_trap(mut self, trap: impl Into<String>) -> Self {
        self.boundary_trap = Some(trap.into());
        self
    }

    pub fn with_false_lead(mut self, lead: impl Into<String>) -> Self {
        self.false_lead = Some(lead.into());
        self
    }
}

/// Build `(system, user)` prompts asking the judge to score `response`.
pub fn judge_prompts(case: &JudgeCase, response: &str) -> (String, String) {
    let user = format!(
        "SCENARIO CONTEXT:\n\
         - Query: {}\n\
         - Ground Truth Chain: {}\n\
         - Boundary Trap: {}\n\
         - False Lead: {}\n\n\
         AGENT RESPONSE TO EVALUATE:\n{}\n\n\
         Evaluate this response against the criteria. Return ONLY valid JSON.",
        case.query,
        case.ground_truth,
        case.boundary_trap.as_deref().unwrap_or("N/A"),
        case.false_lead.as_deref().unwrap_or("N/A"),
        response
    );
    (JUDGE_SYSTEM_PROMPT.to_string(), user)
}

/// Four criterion scores plus the judge's explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeScores {
    pub causal_chain_completeness: f64,
    pub dimensional_separation: f64,
    pub actionability: f64,
    pub boundary_respect: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl JudgeScores {
    /// Parse a judge reply.
    ///
    /// Accepts clean JSON, a markdown-fenced block, or the first valid
    /// object embedded in prose.
    pub fn parse(text: &str) -> Result<Self, JudgeParseError> {
        let json = extract_json(text).ok_or(JudgeParseError::NoJson(text.len()))?;
        let scores: JudgeScores = serde_json::from_str(&json)?;
        scores.check_range()?;
        Ok(scores)
    }

    fn criteria(&self) -> [(&'static str, f64); 4] {
        [
            ("causal_chain_completeness", self.causal_chain_completeness),
            ("dimensional_separation", self.dimensional_separation),
            ("actionability", self.actionability),
            ("boundary_respect", self.boundary_respect),
        ]
    }

    fn check_range(&self) -> Result<(), JudgeParseError> {
        for (criterion, value) in self.criteria() {
            if !(0.0..=MAX_SCORE).contains(&value) {
                return Err(JudgeParseError::OutOfRange { criterion, value });
            }
        }
        Ok(())
    }

    /// Sum of the four criterion scores (0-20).
    pub fn total(&self) -> f64 {
        self.criteria().iter().map(|(_, v)| v).sum()
    }

    pub fn mean(&self) -> f64 {
        self.total() / 4.0
    }

    /// Per-criterion mean over several judgements; `None` for an empty set.
    pub fn average<'a>(scores: impl IntoIterator<Item = &'a JudgeScores>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = [0.0; 4];
        for s in scores {
            for (slot, (_, value)) in sum.iter_mut().zip(s.criteria()) {
                *slot += value;
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            causal_chain_completeness: sum[0] / n,
            dimensional_separation: sum[1] / n,
            actionability: sum[2] / n,
            boundary_respect: sum[3] / n,
            reasoning: format!("Mean of {count} judgements"),
        })
    }
}

fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    if let Some(block) = FENCED_JSON.captures(trimmed).and_then(|c| c.get(1)) {
        let candidate = block.as_str().trim();
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return Some(candidate.to_string());
        }
    }

    embedded_object(trimmed).map(str::to_string)
}

/// First balanced `{...}` in prose that parses as JSON.
///
/// Candidates that fail to parse (`{placeholder}`) are skipped and the scan
/// resumes at the next `{`.
fn embedded_object(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|&(_, ch)| ch == '{')
        .filter_map(|(start, _)| balanced_prefix(&text[start..]))
        .find(|candidate| serde_json::from_str::<serde_json::Value>(candidate).is_ok())
}

/// The object opening at the start of `text`, up to its matching brace.
///
/// String state is only tracked inside the object, so quotes in the
/// surrounding prose cannot flip it.
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
