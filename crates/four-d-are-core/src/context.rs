//! Per-request metric values organised by dimension.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::dimension::Dimension;
use crate::error::ConfigurationError;
use crate::template::DomainTemplate;

/// Metric name to scalar value, iterated in key order.
pub type Metrics = BTreeMap<String, MetricValue>;

/// A scalar metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl MetricValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MetricValue::Bool(b) => serde_json::Value::Bool(*b),
            MetricValue::Number(n) => serde_json::Value::Number(n.clone()),
            MetricValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(b) => write!(f, "{b}"),
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        // JSON has no NaN/inf; keep their text form instead of dropping them
        match serde_json::Number::from_f64(value) {
            Some(n) => MetricValue::Number(n),
            None => MetricValue::Text(value.to_string()),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Number(value.into())
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Number(value.into())
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value.into())
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

/// Metric values for one analysis request.
///
/// Keys are free-form: they are not checked against any template's declared
/// fields. Use [`unknown_keys`](Self::unknown_keys) to see the mismatches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataContext {
    #[serde(default)]
    pub results: Metrics,
    #[serde(default)]
    pub process: Metrics,
    #[serde(default)]
    pub support: Metrics,
    #[serde(default)]
    pub longterm: Metrics,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metric, consuming and returning the context.
    pub fn with_metric(
        mut self,
        dimension: Dimension,
        key: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Self {
        self.dimension_mut(dimension).insert(key.into(), value.into());
        self
    }

    /// Metrics for one dimension.
    pub fn dimension(&self, dimension: Dimension) -> &Metrics {
        match dimension {
            Dimension::Results => &self.results,
            Dimension::Process => &self.process,
            Dimension::Support => &self.support,
            Dimension::Longterm => &self.longterm,
        }
    }

    fn dimension_mut(&mut self, dimension: Dimension) -> &mut Metrics {
        match dimension {
            Dimension::Results => &mut self.results,
            Dimension::Process => &mut self.process,
            Dimension::Support => &mut self.support,
            Dimension::Longterm => &mut self.longterm,
        }
    }

    /// True when all four dimensions are empty.
    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.dimension(*d).is_empty())
    }

    /// Total number of metrics across dimensions.
    pub fn metric_count(&self) -> usize {
        Dimension::ALL.iter().map(|d| self.dimension(*d).len()).sum()
    }

    /// Merge all dimensions into one mapping.
    ///
    /// Dimensions are applied Results -> Process -> Support -> Long-term, so a
    /// key present in several dimensions keeps the value from the last one.
    pub fn flatten(&self) -> Metrics {
        let mut merged = Metrics::new();
        for dimension in Dimension::ALL {
            for (key, value) in self.dimension(dimension) {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Keys that `template` does not declare for the dimension they appear in.
    pub fn unknown_keys(&self, template: &DomainTemplate) -> Vec<(Dimension, String)> {
        let mut unknown = Vec::new();
        for dimension in Dimension::ALL {
            let declared = template.fields(dimension);
            for key in self.dimension(dimension).keys() {
                if !declared.contains(key) {
                    unknown.push((dimension, key.clone()));
                }
            }
        }
        unknown
    }

    /// Parse a `{results, process, support, longterm}` JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retention_context() -> DataContext {
        DataContext::new()
            .with_metric(Dimension::Results, "retention_rate", 0.56)
            .with_metric(Dimension::Results, "target", 0.80)
            .with_metric(Dimension::Process, "visit_frequency", 2.1)
            .with_metric(Dimension::Support, "staffing_ratio", 0.68)
            .with_metric(Dimension::Longterm, "market_trend", "declining")
    }

    #[test]
    fn test_numbers_display_naturally() {
        assert_eq!(MetricValue::from(0.56).to_string(), "0.56");
        assert_eq!(MetricValue::from(2.1).to_string(), "2.1");
        assert_eq!(MetricValue::from(12_i64).to_string(), "12");
        assert_eq!(MetricValue::from(true).to_string(), "true");
        assert_eq!(MetricValue::from("declining").to_string(), "declining");
    }

    #[test]
    fn test_non_finite_float_kept_as_text() {
        assert_eq!(MetricValue::from(f64::NAN), MetricValue::Text("NaN".to_string()));
    }

    #[test]
    fn test_flatten_last_write_wins() {
        let ctx = DataContext::new()
            .with_metric(Dimension::Results, "x", 1)
            .with_metric(Dimension::Process, "x", 2);
        assert_eq!(ctx.flatten().get("x"), Some(&MetricValue::from(2)));
    }

    #[test]
    fn test_flatten_longterm_wins_over_all() {
        let ctx = DataContext::new()
            .with_metric(Dimension::Longterm, "x", "env")
            .with_metric(Dimension::Results, "x", 1)
            .with_metric(Dimension::Support, "x", 3);
        assert_eq!(ctx.flatten().get("x"), Some(&MetricValue::from("env")));
    }

    #[test]
    fn test_missing_dimensions_default_to_empty() {
        let ctx = DataContext::from_json(r#"{"results": {"completion_rate": 0.62}}"#).unwrap();
        assert_eq!(ctx.results.len(), 1);
        assert!(ctx.process.is_empty());
        assert!(ctx.support.is_empty());
        assert!(ctx.longterm.is_empty());
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_mixed_scalar_types_parse() {
        let json = r#"{
            "results": {"completion_rate": 0.62, "rank": 3},
            "support": {"system_upgraded": false},
            "longterm": {"market_trend": "declining"}
        }"#;
        let ctx = DataContext::from_json(json).unwrap();
        assert_eq!(ctx.results["rank"], MetricValue::from(3));
        assert_eq!(ctx.support["system_upgraded"], MetricValue::Bool(false));
        assert_eq!(ctx.metric_count(), 4);
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let json = r#"{"results": {"breakdown": {"a": 1}}}"#;
        assert!(matches!(
            DataContext::from_json(json),
            Err(ConfigurationError::JsonError(_))
        ));
    }

    #[test]
    fn test_unknown_keys_against_banking() {
        let template = DomainTemplate::preset("banking").unwrap();
        let unknown = retention_context().unknown_keys(&template);
        assert!(unknown.contains(&(Dimension::Results, "retention_rate".to_string())));
        assert!(!unknown.iter().any(|(_, k)| k == "visit_frequency"));
        assert!(!unknown.iter().any(|(_, k)| k == "market_trend"));
    }

    #[test]
    fn test_json_round_trip() {
        let ctx = retention_context();
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(DataContext::from_json(&json).unwrap(), ctx);
    }
}
