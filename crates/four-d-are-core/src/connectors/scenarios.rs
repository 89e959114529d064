//! Built-in demo scenarios and the static connector that serves them.

use lazy_static::lazy_static;

use super::{query_context, ConnectorError, DataConnector};
use crate::context::{DataContext, Metrics};
use crate::dimension::Dimension::{Longterm, Process, Results, Support};

/// A canned analysis case with known ground truth.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Question a manager would ask about this case.
    pub query: &'static str,
    /// Preset the scenario's metrics are named after.
    pub preset: &'static str,
    pub context: DataContext,
    /// Expected causal chain, Long-term first.
    pub ground_truth: &'static str,
}

lazy_static! {
    static ref SCENARIOS: Vec<Scenario> = vec![
        Scenario {
            id: "banking_retention",
            name: "Banking Customer Retention",
            description: "Customer retention rate dropped from 80% to 56%",
            query: "Why is customer retention rate only 56% when our target is 80%?",
            preset: "banking",
            context: DataContext::new()
                .with_metric(Results, "retention_rate", 0.56)
                .with_metric(Results, "target_retention", 0.80)
                .with_metric(Results, "customer_satisfaction", 0.72)
                .with_metric(Results, "nps_score", 32)
                .with_metric(Process, "visit_frequency", 2.1)
                .with_metric(Process, "cross_sell_rate", 0.28)
                .with_metric(Process, "quality_score", 0.82)
                .with_metric(Process, "response_time_hours", 4.5)
                .with_metric(Process, "first_contact_resolution", 0.65)
                .with_metric(Support, "staffing_ratio", 0.68)
                .with_metric(Support, "training_completion", 0.91)
                .with_metric(Support, "system_availability", 0.995)
                .with_metric(Support, "marketing_coverage", 0.45)
                .with_metric(Longterm, "market_trend", "declining")
                .with_metric(Longterm, "competitor_entries", 3)
                .with_metric(Longterm, "regulatory_changes", true)
                .with_metric(Longterm, "economic_outlook", "uncertain"),
            ground_truth:
                "Market decline -> Staff attrition -> Reduced visit frequency -> Lower retention",
        },
        Scenario {
            id: "banking_aum",
            name: "Banking AUM Growth",
            description: "AUM growth stalled at 2% vs 8% target",
            query: "Why has AUM growth stalled at 2% against an 8% target?",
            preset: "banking",
            context: DataContext::new()
                .with_metric(Results, "aum_growth", 0.02)
                .with_metric(Results, "target_growth", 0.08)
                .with_metric(Results, "new_deposits", 150_000_000_i64)
                .with_metric(Results, "outflows", 120_000_000_i64)
                .with_metric(Process, "advisor_meetings", 3.2)
                .with_metric(Process, "product_recommendations", 1.8)
                .with_metric(Process, "follow_up_rate", 0.55)
                .with_metric(Process, "proposal_acceptance", 0.32)
                .with_metric(Support, "advisor_capacity", 0.92)
                .with_metric(Support, "product_availability", 0.85)
                .with_metric(Support, "digital_tools_adoption", 0.60)
                .with_metric(Longterm, "interest_rate_trend", "rising")
                .with_metric(Longterm, "market_volatility", "high")
                .with_metric(Longterm, "competitor_rates", "aggressive"),
            ground_truth:
                "Market volatility -> Client hesitancy -> Low proposal acceptance -> Stalled growth",
        },
        Scenario {
            id: "healthcare_readmission",
            name: "Healthcare Readmission Rate",
            description: "30-day readmission rate at 18% vs 12% target",
            query: "Why is our 30-day readmission rate 18% when the target is 12%?",
            preset: "healthcare",
            context: DataContext::new()
                .with_metric(Results, "readmission_rate_30d", 0.18)
                .with_metric(Results, "target_rate", 0.12)
                .with_metric(Results, "patient_satisfaction", 0.78)
                .with_metric(Results, "mortality_rate", 0.02)
                .with_metric(Process, "discharge_planning_score", 0.72)
                .with_metric(Process, "medication_reconciliation", 0.85)
                .with_metric(Process, "follow_up_appointment_rate", 0.60)
                .with_metric(Process, "patient_education_completion", 0.68)
                .with_metric(Support, "nurse_patient_ratio", 1.0 / 5.2)
                .with_metric(Support, "care_coordinator_coverage", 0.45)
                .with_metric(Support, "bed_availability", 0.88)
                .with_metric(Longterm, "population_aging", "accelerating")
                .with_metric(Longterm, "chronic_disease_prevalence", "increasing")
                .with_metric(Longterm, "insurance_coverage_changes", true),
            ground_truth:
                "Aging population -> Higher acuity -> Insufficient follow-up -> Higher readmissions",
        },
    ];
}

/// All built-in scenarios, in a stable order.
pub fn demo_scenarios() -> &'static [Scenario] {
    &SCENARIOS
}

pub fn find_scenario(id: &str) -> Result<&'static Scenario, ConnectorError> {
    SCENARIOS
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ConnectorError::UnknownScenario(id.to_string()))
}

/// Connector over a fixed in-memory context.
#[derive(Debug, Clone)]
pub struct StaticConnector {
    name: String,
    context: DataContext,
}

impl StaticConnector {
    pub fn new(name: impl Into<String>, context: DataContext) -> Self {
        Self {
            name: name.into(),
            context,
        }
    }

    /// Serve one of the built-in demo scenarios.
    pub fn from_scenario(id: &str) -> Result<Self, ConnectorError> {
        let scenario = find_scenario(id)?;
        Ok(Self::new(scenario.id, scenario.context.clone()))
    }
}

impl DataConnector for StaticConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn results_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.results.clone())
    }

    fn process_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.process.clone())
    }

    fn support_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.support.clone())
    }

    fn longterm_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.longterm.clone())
    }

    fn query(&self, query: &str) -> Result<serde_json::Value, ConnectorError> {
        query_context(&self.context, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::collect_context;
    use crate::context::MetricValue;
    use crate::template::DomainTemplate;

    #[test]
    fn test_scenario_ids_are_stable() {
        let ids: Vec<_> = demo_scenarios().iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec!["banking_retention", "banking_aum", "healthcare_readmission"]
        );
    }

    #[test]
    fn test_every_scenario_is_complete() {
        for scenario in demo_scenarios() {
            for dimension in crate::Dimension::ALL {
                assert!(
                    !scenario.context.dimension(dimension).is_empty(),
                    "{} has no {dimension} metrics",
                    scenario.id
                );
            }
            assert!(DomainTemplate::preset(scenario.preset).is_ok());
            assert!(scenario.ground_truth.contains("->"));
        }
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(matches!(
            StaticConnector::from_scenario("retail_footfall"),
            Err(ConnectorError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_collect_context_matches_scenario() {
        let connector = StaticConnector::from_scenario("banking_retention").unwrap();
        let ctx = collect_context(&connector).unwrap();
        assert_eq!(ctx, find_scenario("banking_retention").unwrap().context);
        assert_eq!(ctx.results["retention_rate"], MetricValue::from(0.56));
        assert_eq!(connector.name(), "banking_retention");
    }

    #[test]
    fn test_static_query() {
        let connector = StaticConnector::from_scenario("healthcare_readmission").unwrap();
        assert_eq!(
            connector.query("longterm.population_aging").unwrap(),
            serde_json::json!("accelerating")
        );
    }
}
