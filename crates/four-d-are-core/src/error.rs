//! Configuration errors shared by templates, data contexts and agent settings.

use thiserror::Error;

/// Malformed or missing configuration.
///
/// Raised eagerly at construction time: an invalid template or missing
/// credential never reaches the point of issuing a completion request.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{name} not set: configure '{env_var}' environment variable or pass it explicitly")]
    MissingCredential {
        name: &'static str,
        env_var: &'static str,
    },

    #[error("Template schema validation failed: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Unknown template preset: '{0}'. Available: banking, healthcare, ecommerce")]
    UnknownPreset(String),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ConfigurationError {
    /// Shorthand for an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_env_var() {
        let err = ConfigurationError::MissingCredential {
            name: "OpenAI API key",
            env_var: "OPENAI_API_KEY",
        };
        let msg = err.to_string();
        assert!(msg.contains("OpenAI API key"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_schema_error_joins_messages() {
        let err = ConfigurationError::SchemaError(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Template schema validation failed: a; b");
    }
}
