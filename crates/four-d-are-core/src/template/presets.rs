//! Built-in domain templates.

use lazy_static::lazy_static;

use super::parser::DomainTemplate;

/// Names accepted by [`DomainTemplate::preset`].
pub const PRESET_NAMES: [&str; 3] = ["banking", "healthcare", "ecommerce"];

lazy_static! {
    /// Defaults used by [`DomainTemplate::builder`].
    pub(crate) static ref GENERAL: DomainTemplate = DomainTemplate::from_static(
        "General Business",
        &["completion_rate", "customer_satisfaction"],
        &["visit_frequency", "cross_sell_rate", "quality_score"],
        &["staffing_ratio", "marketing_coverage", "training_completion"],
        &["market_trend", "competitor_entries", "regulatory_changes"],
        &[
            "Never recommend on personnel matters (hiring, firing, transfers, compensation)",
            "Never make strategic resource allocation decisions",
        ],
    );

    pub static ref BANKING: DomainTemplate = DomainTemplate::from_static(
        "Banking Operations",
        &["completion_rate", "AUM_growth", "customer_retention", "new_customer_acquisition"],
        &["visit_frequency", "cross_sell_rate", "quality_score", "conversion_rate"],
        &["staffing_ratio", "marketing_coverage", "training_completion", "system_availability"],
        &["market_trend", "competitor_entries", "regulatory_changes", "economic_cycle"],
        &[
            "Never recommend on personnel matters (hiring, firing, transfers, compensation)",
            "Never make strategic resource allocation decisions",
            "Use hedged language for all inferences",
        ],
    );

    pub static ref HEALTHCARE: DomainTemplate = DomainTemplate::from_static(
        "Healthcare Operations",
        &["readmission_rate", "patient_satisfaction", "mortality_rate", "length_of_stay"],
        &["care_coordination", "treatment_adherence", "diagnostic_accuracy", "follow_up_rate"],
        &["nurse_patient_ratio", "equipment_availability", "bed_occupancy", "staff_training"],
        &[
            "regulatory_changes",
            "population_health_trends",
            "insurance_coverage",
            "technology_adoption",
        ],
        &[
            "Never recommend specific treatment decisions for individual patients",
            "Never suggest specific personnel actions",
            "Use clinical evidence language: 'evidence suggests', 'studies indicate'",
        ],
    );

    pub static ref ECOMMERCE: DomainTemplate = DomainTemplate::from_static(
        "E-commerce Operations",
        &["conversion_rate", "average_order_value", "customer_lifetime_value", "return_rate"],
        &[
            "page_load_time",
            "checkout_completion",
            "search_relevance",
            "recommendation_click_rate",
        ],
        &[
            "inventory_availability",
            "customer_service_capacity",
            "fulfillment_speed",
            "platform_uptime",
        ],
        &["market_trends", "competitor_pricing", "seasonal_patterns", "consumer_behavior_shifts"],
        &[
            "Never recommend specific pricing decisions",
            "Never suggest personnel changes",
            "Use data-driven language with confidence intervals where applicable",
        ],
    );
}
