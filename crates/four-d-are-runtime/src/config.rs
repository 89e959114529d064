//! Agent settings.
//!
//! Settings are assembled once (usually from the environment at startup) and
//! injected into the agent. Nothing in the runtime reads the environment
//! behind the caller's back.

use four_d_are_core::ConfigurationError;
use std::time::Duration;

use crate::providers::{ApiCredential, CompletionConfig, CredentialSource, OpenAiProvider};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "MODEL_AGENT";
pub const TIMEOUT_ENV: &str = "FOUR_D_ARE_TIMEOUT";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const API_KEY_NAME: &str = "OpenAI API key";

/// Endpoint and sampling configuration for an [`AttributionAgent`](crate::AttributionAgent).
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub api_key: Option<ApiCredential>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AgentSettings {
    /// Defaults plus a programmatic API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                API_KEY_NAME,
            )),
            ..Self::default()
        }
    }

    /// Read settings from the process environment.
    ///
    /// A missing API key is not an error here; [`validate`](Self::validate)
    /// reports it. A malformed timeout is.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(key) = non_blank(API_KEY_ENV) {
            settings.api_key = Some(ApiCredential::new(
                key,
                CredentialSource::Environment,
                API_KEY_NAME,
            ));
        }
        if let Some(base_url) = non_blank(BASE_URL_ENV) {
            settings.base_url = base_url;
        }
        if let Some(model) = non_blank(MODEL_ENV) {
            settings.model = model;
        }
        if let Some(timeout) = non_blank(TIMEOUT_ENV) {
            settings.timeout = humantime::parse_duration(timeout.trim())
                .map_err(|e| ConfigurationError::invalid(TIMEOUT_ENV, e.to_string()))?;
        }

        Ok(settings)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check everything needed to issue a request.
    ///
    /// Besides requiring a key, a base URL and a model, this rejects a base
    /// URL without an `http://` or `https://` scheme, a temperature outside
    /// 0.0-2.0 and a zero `max_tokens`. Such values could only ever fail at
    /// the endpoint, so they are reported here before any request is made.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.has_api_key() {
            return Err(ConfigurationError::MissingCredential {
                name: API_KEY_NAME,
                env_var: API_KEY_ENV,
            });
        }

        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigurationError::MissingField("base_url".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigurationError::invalid(
                "base_url",
                "must start with http:// or https://",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigurationError::MissingField("model".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigurationError::invalid(
                "temperature",
                format!("{} is outside 0.0-2.0", self.temperature),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigurationError::invalid("max_tokens", "must be positive"));
        }

        Ok(())
    }

    /// Validate, then build the endpoint client these settings describe.
    pub fn connect(self) -> Result<(OpenAiProvider, CompletionConfig), ConfigurationError> {
        self.validate()?;
        let completion = self.completion_config();
        let credential = self.api_key.ok_or(ConfigurationError::MissingCredential {
            name: API_KEY_NAME,
            env_var: API_KEY_ENV,
        })?;
        let provider = OpenAiProvider::new(credential, self.base_url)?;
        Ok((provider, completion))
    }

    /// Per-request completion settings derived from these settings.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}
