//! The attribution agent.
//!
//! One `analyze` call is: validate, assemble prompts, issue exactly one
//! completion request, return the text. No retries, no caching, no fallback.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use four_d_are_core::{
    build_system_prompt, build_user_prompt, collect_context, ConfigurationError, ConnectorError,
    DataConnector, DataContext, DomainTemplate,
};

use crate::config::AgentSettings;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// Failure of an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Upstream completion failed: {0}")]
    Upstream(#[from] ProviderError),

    /// Only produced by [`AttributionAgent::analyze_from_connector`].
    #[error("Data connector failed: {0}")]
    Connector(#[from] ConnectorError),
}

/// Explains metric movements by tracing them through the four dimensions.
///
/// Immutable after construction and cheap to clone; concurrent `analyze`
/// calls share nothing mutable.
#[derive(Clone)]
pub struct AttributionAgent {
    template: DomainTemplate,
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
}

impl std::fmt::Debug for AttributionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributionAgent")
            .field("domain", &self.template.domain())
            .field("provider", &self.provider.name())
            .field("model", &self.completion.model)
            .finish()
    }
}

impl AttributionAgent {
    /// Agent for the banking preset.
    pub fn new(settings: AgentSettings) -> Result<Self, ConfigurationError> {
        Self::with_settings(settings, DomainTemplate::preset("banking")?)
    }

    /// Agent for `template` talking to the OpenAI-compatible endpoint in `settings`.
    ///
    /// Fails before any network activity if the settings are incomplete.
    pub fn with_settings(
        settings: AgentSettings,
        template: DomainTemplate,
    ) -> Result<Self, ConfigurationError> {
        let (provider, completion) = settings.connect()?;

        tracing::debug!(
            domain = template.domain(),
            base_url = provider.base_url(),
            model = %completion.model,
            "Created attribution agent"
        );

        Ok(Self {
            template,
            provider: Arc::new(provider),
            completion,
        })
    }

    /// Agent over an arbitrary provider.
    pub fn with_provider(
        provider: Arc<dyn LlmProvider>,
        template: DomainTemplate,
        completion: CompletionConfig,
    ) -> Self {
        Self {
            template,
            provider,
            completion,
        }
    }

    /// Same endpoint and settings, different domain.
    pub fn with_template(&self, template: DomainTemplate) -> Self {
        Self {
            template,
            provider: Arc::clone(&self.provider),
            completion: self.completion.clone(),
        }
    }

    pub fn template(&self) -> &DomainTemplate {
        &self.template
    }

    pub fn completion_config(&self) -> &CompletionConfig {
        &self.completion
    }

    /// The `(system, user)` prompts `analyze` would send.
    pub fn prompts(&self, query: &str, data_context: &DataContext) -> (String, String) {
        (
            build_system_prompt(&self.template),
            build_user_prompt(query, data_context),
        )
    }

    /// Run one attribution analysis and return the model's text unmodified.
    pub async fn analyze(
        &self,
        query: &str,
        data_context: &DataContext,
    ) -> Result<String, AnalysisError> {
        if query.trim().is_empty() {
            return Err(ConfigurationError::MissingField("query".to_string()).into());
        }

        let unknown = data_context.unknown_keys(&self.template);
        if !unknown.is_empty() {
            tracing::debug!(
                domain = self.template.domain(),
                unknown = ?unknown,
                "Data context has keys the template does not declare"
            );
        }

        let (system, user) = self.prompts(query, data_context);
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];

        tracing::info!(
            provider = self.provider.name(),
            model = %self.completion.model,
            domain = self.template.domain(),
            metrics = data_context.metric_count(),
            "Starting attribution analysis"
        );
        let started = Instant::now();

        let response = self
            .provider
            .complete(messages, &self.completion)
            .await
            .map_err(|e| {
                tracing::warn!(
                    provider = self.provider.name(),
                    status = ?e.status(),
                    error = %e,
                    "Completion request failed"
                );
                AnalysisError::Upstream(e)
            })?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = response.content.len(),
            total_tokens = response.usage.total(),
            "Attribution analysis finished"
        );

        Ok(response.content)
    }

    /// Snapshot `connector` into a data context, then [`analyze`](Self::analyze).
    pub async fn analyze_from_connector(
        &self,
        query: &str,
        connector: &dyn DataConnector,
    ) -> Result<String, AnalysisError> {
        let data_context = collect_context(connector)?;
        self.analyze(query, &data_context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionResponse, TokenUsage};
    use async_trait::async_trait;
    use four_d_are_core::{Dimension, StaticConnector};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records the messages it receives and replies with a fixed result.
    struct MockProvider {
        calls: AtomicUsize,
        last_messages: Mutex<Vec<ChatMessage>>,
        fail_with: Option<u16>,
    }

    impl MockProvider {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
                fail_with: Some(status),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            if let Some(status) = self.fail_with {
                return Err(ProviderError::ApiError {
                    status,
                    message: "mock failure".to_string(),
                });
            }
            Ok(CompletionResponse {
                content: "【结果现状】retention 56%".to_string(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: Some("stop".to_string()),
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn agent(provider: Arc<MockProvider>) -> AttributionAgent {
        AttributionAgent::with_provider(
            provider,
            DomainTemplate::preset("banking").unwrap(),
            CompletionConfig::default(),
        )
    }

    fn context() -> DataContext {
        DataContext::new()
            .with_metric(Dimension::Results, "retention_rate", 0.56)
            .with_metric(Dimension::Longterm, "market_trend", "declining")
    }

    #[tokio::test]
    async fn test_analyze_sends_system_then_user() {
        let provider = MockProvider::ok();
        let result = agent(provider.clone())
            .analyze("Why is retention low?", &context())
            .await
            .unwrap();

        assert_eq!(result, "【结果现状】retention 56%");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let messages = provider.last_messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Domain: Banking Operations"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("retention_rate: 0.56"));
    }

    #[tokio::test]
    async fn test_empty_query_fails_before_call() {
        let provider = MockProvider::ok();
        let result = agent(provider.clone()).analyze("   ", &context()).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Configuration(ConfigurationError::MissingField(ref f))) if f == "query"
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_retried() {
        let provider = MockProvider::failing(503);
        let result = agent(provider.clone()).analyze("Why?", &context()).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Upstream(ProviderError::ApiError { status: 503, .. }))
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_context_still_analyzes() {
        let provider = MockProvider::ok();
        agent(provider.clone())
            .analyze("Why?", &DataContext::new())
            .await
            .unwrap();
        let messages = provider.last_messages.lock().unwrap().clone();
        assert!(messages[1].content.contains("(no data available)"));
    }

    #[tokio::test]
    async fn test_analyze_from_connector() {
        let provider = MockProvider::ok();
        let connector = StaticConnector::from_scenario("banking_aum").unwrap();
        agent(provider.clone())
            .analyze_from_connector("Why has AUM stalled?", &connector)
            .await
            .unwrap();
        let messages = provider.last_messages.lock().unwrap().clone();
        assert!(messages[1].content.contains("proposal_acceptance: 0.32"));
    }

    #[test]
    fn test_with_template_keeps_provider() {
        let base = agent(MockProvider::ok());
        let healthcare = base.with_template(DomainTemplate::preset("healthcare").unwrap());
        assert_eq!(healthcare.template().domain(), "Healthcare Operations");
        assert_eq!(base.template().domain(), "Banking Operations");
        assert_eq!(healthcare.completion_config(), base.completion_config());
    }

    #[test]
    fn test_construction_without_key_fails() {
        let result = AttributionAgent::new(AgentSettings::default());
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let agent = AttributionAgent::new(AgentSettings::with_api_key("sk-hidden")).unwrap();
        let debug = format!("{agent:?}");
        assert!(!debug.contains("sk-hidden"));
        assert!(debug.contains("Banking Operations"));
    }
}
