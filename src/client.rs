//! Client facade: scheme-based dispatch across custom and standard providers.
//!
//! [`LlmClient`] fronts two completion paths: custom providers that shell
//! out to local CLIs, and an injected [`CompletionBackend`] standing in for
//! the hosted multi-provider surface. Custom providers are passed in at
//! construction rather than registered in shared global state, so building
//! multiple clients cannot accumulate duplicate registrations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::{CompletionOptions, CustomProvider, LLMResult, Message};
use crate::response::{ModelResponse, ResponseOrigin};

/// The standard multi-provider completion surface.
///
/// Everything this crate has no custom provider for is delegated here:
/// routing, retries, and cost accounting for hosted providers are the
/// backend's concern, not this crate's.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one completion request against a hosted provider.
    async fn completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> LLMResult<ModelResponse>;

    /// Compute the monetary cost of a response from its token counts and
    /// published pricing tables.
    fn completion_cost(&self, response: &ModelResponse) -> f64;
}

/// Unified completion client.
pub struct LlmClient {
    backend: Box<dyn CompletionBackend>,
    custom_providers: Vec<Arc<dyn CustomProvider>>,
}

impl LlmClient {
    /// Create a client over a backend and a set of custom providers.
    ///
    /// If two providers share a name, the first one wins dispatch.
    pub fn new(
        backend: Box<dyn CompletionBackend>,
        custom_providers: Vec<Arc<dyn CustomProvider>>,
    ) -> Self {
        Self {
            backend,
            custom_providers,
        }
    }

    /// Issue one completion request.
    ///
    /// The model identifier's scheme (the part before the first `/`)
    /// selects a custom provider when it matches one; the provider receives
    /// the remainder of the identifier. Everything else passes through to
    /// the backend untouched.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> LLMResult<ModelResponse> {
        if let Some((scheme, rest)) = model.split_once('/') {
            if let Some(provider) = self.custom_providers.iter().find(|p| p.name() == scheme) {
                tracing::debug!("dispatching {} to custom provider {}", model, scheme);
                return provider.completion(rest, messages, options).await;
            }
        }

        self.backend.completion(model, messages, options).await
    }

    /// Monetary cost of a response in USD.
    ///
    /// CLI-originated responses carry the cost the external tool computed;
    /// it is returned verbatim, never recomputed from token counts.
    /// Standard responses are priced by the backend.
    pub fn cost(&self, response: &ModelResponse) -> f64 {
        match response.origin {
            ResponseOrigin::CliProvider => response.cost_usd,
            ResponseOrigin::Standard => self.backend.completion_cost(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;
    use crate::response::{Choice, ChoiceMessage, ResponseUsage};
    use std::sync::Mutex;

    fn response(origin: ResponseOrigin, model: &str, cost_usd: f64) -> ModelResponse {
        ModelResponse {
            id: format!("test_{}", model),
            model: model.to_string(),
            created: 1,
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage {
                    role: Role::Assistant,
                    content: "ok".to_string(),
                },
                finish_reason: "stop".to_string(),
            }],
            usage: ResponseUsage::default(),
            cost_usd,
            origin,
        }
    }

    /// Backend recording the models it was asked to complete.
    struct MockBackend {
        seen_models: Mutex<Vec<String>>,
        cost: f64,
    }

    impl MockBackend {
        fn new(cost: f64) -> Self {
            Self {
                seen_models: Mutex::new(vec![]),
                cost,
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn completion(
            &self,
            model: &str,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> LLMResult<ModelResponse> {
            self.seen_models.lock().unwrap().push(model.to_string());
            Ok(response(ResponseOrigin::Standard, model, 0.0))
        }

        fn completion_cost(&self, _response: &ModelResponse) -> f64 {
            self.cost
        }
    }

    /// Custom provider recording the model it received after dispatch.
    struct MockProvider {
        name: String,
        seen_models: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                seen_models: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl CustomProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn completion(
            &self,
            model: &str,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> LLMResult<ModelResponse> {
            self.seen_models.lock().unwrap().push(model.to_string());
            Ok(response(ResponseOrigin::CliProvider, model, 0.05))
        }
    }

    #[tokio::test]
    async fn test_complete_dispatches_to_custom_provider() {
        let provider = Arc::new(MockProvider::new("claudecode"));
        let client = LlmClient::new(Box::new(MockBackend::new(0.0)), vec![provider.clone()]);

        let messages = vec![Message::user("hello")];
        let response = client
            .complete("claudecode/opus", &messages, &CompletionOptions::default())
            .await
            .unwrap();

        // Provider receives the identifier with the scheme stripped
        assert_eq!(provider.seen_models.lock().unwrap().as_slice(), ["opus"]);
        assert_eq!(response.origin, ResponseOrigin::CliProvider);
    }

    #[tokio::test]
    async fn test_complete_passes_through_to_backend() {
        let backend = Box::new(MockBackend::new(0.0));
        let provider = Arc::new(MockProvider::new("claudecode"));
        let client = LlmClient::new(backend, vec![provider.clone()]);

        for model in ["gpt-4o", "openai/gpt-4o", "claudecode"] {
            let result = client
                .complete(model, &[], &CompletionOptions::default())
                .await
                .unwrap();
            assert_eq!(result.origin, ResponseOrigin::Standard);
            // Backend sees the identifier untouched
            assert_eq!(result.model, model);
        }

        assert!(provider.seen_models.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_first_provider_wins_on_name_collision() {
        let first = Arc::new(MockProvider::new("claudecode"));
        let second = Arc::new(MockProvider::new("claudecode"));
        let client = LlmClient::new(
            Box::new(MockBackend::new(0.0)),
            vec![first.clone(), second.clone()],
        );

        client
            .complete("claudecode/opus", &[], &CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(first.seen_models.lock().unwrap().len(), 1);
        assert!(second.seen_models.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cost_cli_response_uses_carried_value() {
        // Backend would price anything at 9.99; the CLI value must win.
        let client = LlmClient::new(Box::new(MockBackend::new(9.99)), vec![]);
        let cli_response = response(ResponseOrigin::CliProvider, "opus", 0.01);

        assert_eq!(client.cost(&cli_response), 0.01);
    }

    #[test]
    fn test_cost_standard_response_delegates_to_backend() {
        let client = LlmClient::new(Box::new(MockBackend::new(0.42)), vec![]);
        // cost_usd on a standard response is ignored in favor of the backend.
        let standard = response(ResponseOrigin::Standard, "gpt-4o", 123.0);

        assert_eq!(client.cost(&standard), 0.42);
    }
}
