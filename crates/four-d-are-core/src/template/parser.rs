//! Domain template construction, validation and parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::presets;
use super::schema::validate_template_schema;
use crate::dimension::Dimension;
use crate::error::ConfigurationError;

/// Output language used when a template does not set one.
pub const DEFAULT_LANGUAGE: &str = "Chinese";

/// Declarative description of one business domain.
///
/// Immutable once built. Every field-name sequence and the boundary list are
/// guaranteed non-empty, and the domain label is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateDocument")]
pub struct DomainTemplate {
    domain: String,
    results: Vec<String>,
    process: Vec<String>,
    support: Vec<String>,
    longterm: Vec<String>,
    boundaries: Vec<String>,
    language: String,
}

/// On-disk shape of a template, before invariants are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateDocument {
    domain: String,
    results: Vec<String>,
    process: Vec<String>,
    support: Vec<String>,
    longterm: Vec<String>,
    boundaries: Vec<String>,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl TryFrom<TemplateDocument> for DomainTemplate {
    type Error = ConfigurationError;

    fn try_from(doc: TemplateDocument) -> Result<Self, Self::Error> {
        let template = DomainTemplate {
            domain: doc.domain,
            results: doc.results,
            process: doc.process,
            support: doc.support,
            longterm: doc.longterm,
            boundaries: doc.boundaries,
            language: doc.language,
        };
        template.validate()?;
        Ok(template)
    }
}

impl DomainTemplate {
    /// Start building a template for the given domain.
    ///
    /// The builder is pre-filled with the general-business field names and
    /// boundaries; override whichever dimensions the domain needs.
    pub fn builder(domain: impl Into<String>) -> DomainTemplateBuilder {
        DomainTemplateBuilder::new(domain)
    }

    /// Look up a built-in preset by name (case-insensitive).
    ///
    /// Accepted names: `banking`, `healthcare`, `ecommerce` (also `e-commerce`).
    pub fn preset(name: &str) -> Result<Self, ConfigurationError> {
        match name.trim().to_lowercase().as_str() {
            "banking" => Ok(presets::BANKING.clone()),
            "healthcare" => Ok(presets::HEALTHCARE.clone()),
            "ecommerce" | "e-commerce" => Ok(presets::ECOMMERCE.clone()),
            _ => Err(ConfigurationError::UnknownPreset(name.to_string())),
        }
    }

    /// Parse a template from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a template from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a template from a file, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON; everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), is_json, "Loading domain template");

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigurationError> {
        validate_template_schema(&value).map_err(ConfigurationError::SchemaError)?;
        let doc: TemplateDocument = serde_json::from_value(value)?;
        Self::try_from(doc)
    }

    /// Build a template from trusted static data without validation.
    ///
    /// Only used for the built-in presets, which are covered by tests.
    pub(crate) fn from_static(
        domain: &str,
        results: &[&str],
        process: &[&str],
        support: &[&str],
        longterm: &[&str],
        boundaries: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            domain: domain.to_string(),
            results: owned(results),
            process: owned(process),
            support: owned(support),
            longterm: owned(longterm),
            boundaries: owned(boundaries),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Check the construction invariants.
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigurationError::MissingField("domain".to_string()));
        }

        for dimension in Dimension::ALL {
            if self.fields(dimension).is_empty() {
                return Err(ConfigurationError::MissingField(dimension.key().to_string()));
            }
        }

        if self.boundaries.is_empty() {
            return Err(ConfigurationError::MissingField("boundaries".to_string()));
        }

        Ok(())
    }

    /// Free-text domain label.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Declared field names for a dimension.
    pub fn fields(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Results => &self.results,
            Dimension::Process => &self.process,
            Dimension::Support => &self.support,
            Dimension::Longterm => &self.longterm,
        }
    }

    /// Boundary rules, in declaration order.
    pub fn boundaries(&self) -> &[String] {
        &self.boundaries
    }

    /// Output-language hint.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Serialize to a YAML document that [`from_yaml`](Self::from_yaml) accepts.
    pub fn to_yaml(&self) -> Result<String, ConfigurationError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Builder for [`DomainTemplate`]; invariants are checked in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct DomainTemplateBuilder {
    domain: String,
    results: Vec<String>,
    process: Vec<String>,
    support: Vec<String>,
    longterm: Vec<String>,
    boundaries: Vec<String>,
    language: String,
}

impl DomainTemplateBuilder {
    fn new(domain: impl Into<String>) -> Self {
        let general = presets::GENERAL.clone();
        Self {
            domain: domain.into(),
            results: general.results,
            process: general.process,
            support: general.support,
            longterm: general.longterm,
            boundaries: general.boundaries,
            language: general.language,
        }
    }

    /// Set the field names for one dimension, replacing the defaults.
    pub fn fields<I, S>(mut self, dimension: Dimension, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        match dimension {
            Dimension::Results => self.results = fields,
            Dimension::Process => self.process = fields,
            Dimension::Support => self.support = fields,
            Dimension::Longterm => self.longterm = fields,
        }
        self
    }

    pub fn results<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(Dimension::Results, fields)
    }

    pub fn process<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(Dimension::Process, fields)
    }

    pub fn support<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(Dimension::Support, fields)
    }

    pub fn longterm<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(Dimension::Longterm, fields)
    }

    /// Replace the boundary rules.
    pub fn boundaries<I, S>(mut self, boundaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boundaries = boundaries.into_iter().map(Into::into).collect();
        self
    }

    /// Set the output-language hint.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Validate and produce the template.
    pub fn build(self) -> Result<DomainTemplate, ConfigurationError> {
        let template = DomainTemplate {
            domain: self.domain,
            results: self.results,
            process: self.process,
            support: self.support,
            longterm: self.longterm,
            boundaries: self.boundaries,
            language: self.language,
        };
        template.validate()?;
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANUFACTURING_YAML: &str = r#"
domain: "Manufacturing Operations"
results: ["production_yield", "defect_rate", "on_time_delivery"]
process: ["cycle_time", "equipment_utilization"]
support: ["machine_availability", "skilled_labor_ratio"]
longterm: ["supply_chain_stability", "market_demand_forecast"]
boundaries:
  - "Never recommend specific equipment purchases over $100K"
  - "Never suggest workforce reductions"
language: "English"
"#;

    #[test]
    fn test_parse_valid_yaml_template() {
        let template = DomainTemplate::from_yaml(MANUFACTURING_YAML).unwrap();
        assert_eq!(template.domain(), "Manufacturing Operations");
        assert_eq!(template.fields(Dimension::Results).len(), 3);
        assert_eq!(template.boundaries().len(), 2);
        assert_eq!(template.language(), "English");
    }

    #[test]
    fn test_language_defaults_when_omitted() {
        let json = r#"{
            "domain": "Retail",
            "results": ["sales"],
            "process": ["footfall"],
            "support": ["staffing"],
            "longterm": ["season"],
            "boundaries": ["Never recommend layoffs"]
        }"#;
        let template = DomainTemplate::from_json(json).unwrap();
        assert_eq!(template.language(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_empty_domain_rejected() {
        let result = DomainTemplate::builder("   ").build();
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingField(ref f)) if f == "domain"
        ));
    }

    #[test]
    fn test_each_empty_dimension_rejected() {
        for dimension in Dimension::ALL {
            let result = DomainTemplate::builder("Test")
                .fields(dimension, Vec::<String>::new())
                .build();
            match result {
                Err(ConfigurationError::MissingField(field)) => {
                    assert_eq!(field, dimension.key())
                }
                other => panic!("expected MissingField for {dimension}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_boundaries_rejected() {
        let result = DomainTemplate::builder("Test")
            .boundaries(Vec::<String>::new())
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingField(ref f)) if f == "boundaries"
        ));
    }

    #[test]
    fn test_builder_defaults_are_general_business() {
        let template = DomainTemplate::builder("General Business").build().unwrap();
        assert_eq!(template, presets::GENERAL.clone());
    }

    #[test]
    fn test_schema_violation_reported_before_invariants() {
        let yaml = r#"
domain: "Test"
results: []
process: ["a"]
support: ["b"]
longterm: ["c"]
boundaries: ["Never do x"]
"#;
        let result = DomainTemplate::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigurationError::SchemaError(_))));
    }

    #[test]
    fn test_serde_deserialize_enforces_invariants() {
        let json = serde_json::json!({
            "domain": "",
            "results": ["a"],
            "process": ["b"],
            "support": ["c"],
            "longterm": ["d"],
            "boundaries": ["Never e"]
        });
        let result: Result<DomainTemplate, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_round_trip_preserves_template() {
        let template = DomainTemplate::from_yaml(MANUFACTURING_YAML).unwrap();
        let yaml = template.to_yaml().unwrap();
        assert_eq!(DomainTemplate::from_yaml(&yaml).unwrap(), template);
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("manufacturing.yaml");
        std::fs::write(&yaml_path, MANUFACTURING_YAML).unwrap();
        let from_yaml = DomainTemplate::from_file(&yaml_path).unwrap();

        let json_path = dir.path().join("manufacturing.json");
        std::fs::write(&json_path, serde_json::to_string(&from_yaml).unwrap()).unwrap();
        let from_json = DomainTemplate::from_file(&json_path).unwrap();

        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = DomainTemplate::from_file("/nonexistent/template.yaml");
        assert!(matches!(result, Err(ConfigurationError::IoError(_))));
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(
            DomainTemplate::preset("Banking").unwrap().domain(),
            "Banking Operations"
        );
        assert_eq!(
            DomainTemplate::preset("e-commerce").unwrap().domain(),
            "E-commerce Operations"
        );
        assert!(matches!(
            DomainTemplate::preset("insurance"),
            Err(ConfigurationError::UnknownPreset(_))
        ));
    }
}
