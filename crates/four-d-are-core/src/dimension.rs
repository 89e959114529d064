//! The four causal dimensions of 4D-ARE.
//!
//! Every metric in an analysis belongs to exactly one dimension, and every
//! dimension carries a fixed authority level that bounds how far the agent
//! may go when talking about it. The mapping is framework policy, not data:
//! it renders identically for every domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed causal categories, in tracing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Observable outcome metrics (D_R)
    Results,

    /// Controllable operational factors (D_P)
    Process,

    /// Resource and capability factors (D_S)
    Support,

    /// External and structural factors (D_L)
    Longterm,
}

impl Dimension {
    /// All dimensions in the fixed order Results -> Process -> Support -> Long-term.
    pub const ALL: [Dimension; 4] = [
        Dimension::Results,
        Dimension::Process,
        Dimension::Support,
        Dimension::Longterm,
    ];

    /// Key used in data files and template documents.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Results => "results",
            Dimension::Process => "process",
            Dimension::Support => "support",
            Dimension::Longterm => "longterm",
        }
    }

    /// Short framework code.
    pub fn code(self) -> &'static str {
        match self {
            Dimension::Results => "D_R",
            Dimension::Process => "D_P",
            Dimension::Support => "D_S",
            Dimension::Longterm => "D_L",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Results => "Results",
            Dimension::Process => "Process",
            Dimension::Support => "Support",
            Dimension::Longterm => "Long-term",
        }
    }

    /// What kind of metric belongs in this dimension.
    pub fn description(self) -> &'static str {
        match self {
            Dimension::Results => "Observable outcome metrics",
            Dimension::Process => "Controllable operational factors",
            Dimension::Support => "Resource and capability factors",
            Dimension::Longterm => "External and structural factors",
        }
    }

    /// Section header the agent must use for this dimension in its answer.
    pub fn response_header(self) -> &'static str {
        match self {
            Dimension::Results => "【结果现状】(Results - display only)",
            Dimension::Process => "【流程归因】(Process - interpretation + specific recommendations)",
            Dimension::Support => "【支撑背景】(Support - context + open suggestions for review)",
            Dimension::Longterm => "【环境背景】(Long-term - context only)",
        }
    }

    /// The fixed authority level for this dimension.
    pub fn authority(self) -> AuthorityLevel {
        match self {
            Dimension::Results => AuthorityLevel::DisplayOnly,
            Dimension::Process => AuthorityLevel::InterpretAndRecommend,
            Dimension::Support => AuthorityLevel::SuggestForReview,
            Dimension::Longterm => AuthorityLevel::ContextOnly,
        }
    }

    /// Parse a dimension key, accepting the common spellings of long-term.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "results" | "result" | "d_r" => Some(Dimension::Results),
            "process" | "d_p" => Some(Dimension::Process),
            "support" | "d_s" => Some(Dimension::Support),
            "longterm" | "long-term" | "long_term" | "d_l" => Some(Dimension::Longterm),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Degree of interpretive latitude granted for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    DisplayOnly,
    InterpretAndRecommend,
    SuggestForReview,
    ContextOnly,
}

impl AuthorityLevel {
    /// The fixed label rendered into system prompts.
    pub fn label(self) -> &'static str {
        match self {
            AuthorityLevel::DisplayOnly => "Display-only",
            AuthorityLevel::InterpretAndRecommend => "Interpret+Recommend",
            AuthorityLevel::SuggestForReview => "Suggest-for-review",
            AuthorityLevel::ContextOnly => "Context-only",
        }
    }

    /// Behavioural rules the agent must follow at this level.
    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            AuthorityLevel::DisplayOnly => &["Present the numbers, no interpretation"],
            AuthorityLevel::InterpretAndRecommend => &[
                "Must explain WHY these factors impact results",
                "Must provide SPECIFIC, ACTIONABLE recommendations",
            ],
            AuthorityLevel::SuggestForReview => &[
                "Can suggest areas for management review, but NOT specific actions",
            ],
            AuthorityLevel::ContextOnly => &[
                "No recommendations",
                "Present as background that constrains what's possible",
            ],
        }
    }
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_authority_mapping() {
        assert_eq!(Dimension::Results.authority().label(), "Display-only");
        assert_eq!(Dimension::Process.authority().label(), "Interpret+Recommend");
        assert_eq!(Dimension::Support.authority().label(), "Suggest-for-review");
        assert_eq!(Dimension::Longterm.authority().label(), "Context-only");
    }

    #[test]
    fn test_from_key_spellings() {
        assert_eq!(Dimension::from_key("Long-term"), Some(Dimension::Longterm));
        assert_eq!(Dimension::from_key("long_term"), Some(Dimension::Longterm));
        assert_eq!(Dimension::from_key(" RESULTS "), Some(Dimension::Results));
        assert_eq!(Dimension::from_key("D_S"), Some(Dimension::Support));
        assert_eq!(Dimension::from_key("finance"), None);
    }

    #[test]
    fn test_key_round_trips_through_from_key() {
        for dimension in Dimension::ALL {
            assert_eq!(Dimension::from_key(dimension.key()), Some(dimension));
        }
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&Dimension::Longterm).unwrap();
        assert_eq!(json, "\"longterm\"");
    }
}
