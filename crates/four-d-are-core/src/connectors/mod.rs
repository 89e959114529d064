//! Data connectors.
//!
//! A connector is any source that can answer "what are the metrics for this
//! dimension?" for all four dimensions, plus a free-form lookup. The agent
//! never talks to connectors itself; [`collect_context`] snapshots one into a
//! [`DataContext`] first.

mod file;
mod scenarios;

pub use file::JsonFileConnector;
pub use scenarios::{demo_scenarios, find_scenario, Scenario, StaticConnector};

use thiserror::Error;

use crate::context::{DataContext, Metrics};
use crate::dimension::Dimension;

/// Failure while reading from a data connector.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Unknown scenario: '{0}'. Available: banking_retention, banking_aum, healthcare_readmission")]
    UnknownScenario(String),

    #[error("No metric matches query '{0}'")]
    UnknownMetric(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Capability interface for a metric source.
pub trait DataConnector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// D_R metrics.
    fn results_metrics(&self) -> Result<Metrics, ConnectorError>;

    /// D_P metrics.
    fn process_metrics(&self) -> Result<Metrics, ConnectorError>;

    /// D_S metrics.
    fn support_metrics(&self) -> Result<Metrics, ConnectorError>;

    /// D_L metrics.
    fn longterm_metrics(&self) -> Result<Metrics, ConnectorError>;

    /// Free-form lookup.
    ///
    /// Built-in connectors accept `"dimension.metric"`, a bare dimension key,
    /// a bare metric name, or `"*"` for everything.
    fn query(&self, query: &str) -> Result<serde_json::Value, ConnectorError>;

    /// Metrics for one dimension.
    fn metrics(&self, dimension: Dimension) -> Result<Metrics, ConnectorError> {
        match dimension {
            Dimension::Results => self.results_metrics(),
            Dimension::Process => self.process_metrics(),
            Dimension::Support => self.support_metrics(),
            Dimension::Longterm => self.longterm_metrics(),
        }
    }
}

/// Snapshot a connector into a [`DataContext`].
pub fn collect_context(connector: &dyn DataConnector) -> Result<DataContext, ConnectorError> {
    let context = DataContext {
        results: connector.results_metrics()?,
        process: connector.process_metrics()?,
        support: connector.support_metrics()?,
        longterm: connector.longterm_metrics()?,
    };
    tracing::debug!(
        connector = connector.name(),
        metrics = context.metric_count(),
        "Collected data context"
    );
    Ok(context)
}

/// Answer a free-form query against an in-memory context.
pub(crate) fn query_context(
    ctx: &DataContext,
    query: &str,
) -> Result<serde_json::Value, ConnectorError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ConnectorError::UnsupportedQuery("empty query".to_string()));
    }
    if query == "*" {
        return Ok(serde_json::to_value(ctx)?);
    }

    if let Some(dimension) = Dimension::from_key(query) {
        return Ok(serde_json::to_value(ctx.dimension(dimension))?);
    }

    if let Some((prefix, metric)) = query.split_once('.') {
        if let Some(dimension) = Dimension::from_key(prefix) {
            return ctx
                .dimension(dimension)
                .get(metric)
                .map(|v| v.to_json())
                .ok_or_else(|| ConnectorError::UnknownMetric(query.to_string()));
        }
    }

    // Bare metric name: report every dimension it appears in
    let mut matches = serde_json::Map::new();
    for dimension in Dimension::ALL {
        if let Some(value) = ctx.dimension(dimension).get(query) {
            matches.insert(dimension.key().to_string(), value.to_json());
        }
    }
    if matches.is_empty() {
        Err(ConnectorError::UnknownMetric(query.to_string()))
    } else {
        Ok(serde_json::Value::Object(matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> DataContext {
        DataContext::new()
            .with_metric(Dimension::Results, "retention_rate", 0.56)
            .with_metric(Dimension::Process, "visit_frequency", 2.1)
            .with_metric(Dimension::Longterm, "market_trend", "declining")
            .with_metric(Dimension::Longterm, "regulatory_changes", true)
    }

    #[test]
    fn test_query_dimension_dot_metric() {
        assert_eq!(query_context(&context(), "process.visit_frequency").unwrap(), json!(2.1));
        assert_eq!(query_context(&context(), "long-term.market_trend").unwrap(), json!("declining"));
    }

    #[test]
    fn test_query_bare_metric_reports_dimension() {
        assert_eq!(
            query_context(&context(), "regulatory_changes").unwrap(),
            json!({"longterm": true})
        );
    }

    #[test]
    fn test_query_whole_dimension() {
        assert_eq!(
            query_context(&context(), "results").unwrap(),
            json!({"retention_rate": 0.56})
        );
    }

    #[test]
    fn test_query_everything() {
        let all = query_context(&context(), "*").unwrap();
        assert_eq!(all["support"], json!({}));
        assert_eq!(all["longterm"]["market_trend"], json!("declining"));
    }

    #[test]
    fn test_query_unknown_metric() {
        assert!(matches!(
            query_context(&context(), "support.staffing_ratio"),
            Err(ConnectorError::UnknownMetric(_))
        ));
        assert!(matches!(
            query_context(&context(), "churn"),
            Err(ConnectorError::UnknownMetric(_))
        ));
        assert!(matches!(
            query_context(&context(), "  "),
            Err(ConnectorError::UnsupportedQuery(_))
        ));
    }
}
