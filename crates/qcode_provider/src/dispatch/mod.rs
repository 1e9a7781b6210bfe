mod policy;

use std::sync::Arc;

use async_trait::async_trait;
pub use policy::*;
use qcode_domain::{CompletionError, CompletionService, CredentialStore, DispatchConfig, ModelId};
use tracing::debug;

use crate::open_router::{ChatRequest, Message, OpenRouter};

/// Sends single-turn prompts to the provider using the stored API key.
pub struct CompletionDispatcher<K> {
    provider: OpenRouter,
    credentials: Arc<K>,
    config: DispatchConfig,
}

impl<K: CredentialStore> CompletionDispatcher<K> {
    pub fn new(provider: OpenRouter, credentials: Arc<K>, config: DispatchConfig) -> Self {
        Self { provider, credentials, config }
    }

    /// Builds the payload for a prompt, with the persona and sampling
    /// parameters chosen for the model.
    pub fn request(prompt: &str, model: &ModelId) -> ChatRequest {
        let policy = RequestPolicy::for_model(model);
        ChatRequest::new(
            model.clone(),
            vec![
                Message::system(policy.persona.system_prompt()),
                Message::user(prompt),
            ],
        )
        .temperature(policy.temperature)
        .max_tokens(policy.max_tokens)
    }

    pub async fn send(&self, prompt: &str, model: &ModelId) -> Result<String, CompletionError> {
        if prompt.trim().is_empty() {
            return Err(CompletionError::InvalidRequest("prompt is empty".to_string()));
        }
        if model.as_str().trim().is_empty() {
            return Err(CompletionError::InvalidRequest("model id is empty".to_string()));
        }

        let api_key = self.credentials.get_key();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            debug!(model = %model, "No API key configured, skipping request");
            return Err(CompletionError::missing_credential());
        }

        let request = Self::request(prompt, model);
        debug!(
            model = %model,
            temperature = %request.temperature.map(|t| t.value()).unwrap_or_default(),
            max_tokens = request.max_tokens.unwrap_or_default(),
            "Dispatching completion"
        );

        self.provider
            .chat(api_key, &request, self.config.timeout)
            .await?
            .into_text()
    }
}

#[async_trait]
impl<K: CredentialStore> CompletionService for CompletionDispatcher<K> {
    async fn send(&self, prompt: &str, model: &ModelId) -> Result<String, CompletionError> {
        CompletionDispatcher::send(self, prompt, model).await
    }
}
