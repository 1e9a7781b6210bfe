use std::sync::Arc;

use qcode_domain::{
    CatalogError, CompletionService, CredentialStore, ModelCatalogService, ModelDescriptor,
    ModelId,
};
use strum_macros::Display;
use tracing::{debug, warn};

pub const MISSING_KEY_MESSAGE: &str = "Please set your OpenRouter API key in Settings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Something the user asked the chat front end to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiRequest {
    SendMessage { text: String, model: ModelId },
    SetApiKey(String),
    /// The catalog as cached, for pickers.
    LoadModels,
    /// The catalog fetched again regardless of the cache age.
    ReloadModels,
}

/// Something the chat front end should show.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    AddMessage {
        role: Role,
        content: String,
        model: Option<ModelId>,
    },
    ShowLoading,
    HideLoading,
    ShowError(String),
    ApiKeySaved,
    ModelsLoaded(Vec<ModelDescriptor>),
}

/// Turns front end requests into service calls and reports progress as
/// events, in the order they should be displayed.
pub struct ChatShell<S, K> {
    services: Arc<S>,
    credentials: Arc<K>,
}

impl<S, K> ChatShell<S, K>
where
    S: ModelCatalogService + CompletionService,
    K: CredentialStore,
{
    pub fn new(services: Arc<S>, credentials: Arc<K>) -> Self {
        Self { services, credentials }
    }

    pub async fn handle<F: FnMut(UiEvent)>(&self, request: UiRequest, mut emit: F) {
        match request {
            UiRequest::SendMessage { text, model } => {
                self.on_message(text, model, &mut emit).await
            }
            UiRequest::SetApiKey(key) => match self.credentials.set_key(&key) {
                Ok(()) => emit(UiEvent::ApiKeySaved),
                Err(error) => {
                    warn!(error = %format!("{error:#}"), "Failed to save API key");
                    emit(UiEvent::ShowError(format!("Failed to save API key: {error:#}")))
                }
            },
            UiRequest::LoadModels => self.on_models(self.services.list().await, &mut emit),
            UiRequest::ReloadModels => {
                debug!("Reloading model catalog");
                self.on_models(self.services.refresh().await, &mut emit)
            }
        }
    }

    fn on_models<F: FnMut(UiEvent)>(
        &self,
        result: Result<Vec<ModelDescriptor>, CatalogError>,
        emit: &mut F,
    ) {
        match result {
            Ok(models) => emit(UiEvent::ModelsLoaded(models)),
            Err(error) => emit(UiEvent::ShowError(format!("Failed to load models: {error}"))),
        }
    }

    async fn on_message<F: FnMut(UiEvent)>(&self, text: String, model: ModelId, emit: &mut F) {
        emit(UiEvent::AddMessage { role: Role::User, content: text.clone(), model: None });
        emit(UiEvent::ShowLoading);

        if !self.credentials.has_key() {
            emit(UiEvent::ShowError(MISSING_KEY_MESSAGE.to_string()));
            emit(UiEvent::HideLoading);
            return;
        }

        debug!(model = %model, "Sending message");
        match CompletionService::send(self.services.as_ref(), &text, &model).await {
            Ok(content) => {
                emit(UiEvent::HideLoading);
                emit(UiEvent::AddMessage { role: Role::Assistant, content, model: Some(model) });
            }
            Err(error) => {
                emit(UiEvent::HideLoading);
                emit(UiEvent::ShowError(format!("Error: {error}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use qcode_domain::{CompletionError, InMemoryCredentialStore};

    use super::*;

    /// Canned answers for both services, recording what was sent.
    struct FakeServices {
        models: Result<Vec<ModelDescriptor>, CatalogError>,
        reply: Result<String, CompletionError>,
        sent: Mutex<Vec<(String, ModelId)>>,
        catalog_calls: Mutex<Vec<&'static str>>,
    }

    impl FakeServices {
        fn new() -> Self {
            Self {
                models: Ok(vec![ModelDescriptor::new("qwen/qwen3-coder:free", "Qwen3 Coder (free)")]),
                reply: Ok("Use a for loop.".to_string()),
                sent: Mutex::new(Vec::new()),
                catalog_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelCatalogService for FakeServices {
        async fn list(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
            self.catalog_calls.lock().unwrap().push("list");
            self.models.clone()
        }

        async fn refresh(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
            self.catalog_calls.lock().unwrap().push("refresh");
            self.models.clone()
        }
    }

    #[async_trait]
    impl CompletionService for FakeServices {
        async fn send(&self, prompt: &str, model: &ModelId) -> Result<String, CompletionError> {
            self.sent.lock().unwrap().push((prompt.to_string(), model.clone()));
            self.reply.clone()
        }
    }

    async fn run(
        services: FakeServices,
        key: &str,
        request: UiRequest,
    ) -> (Vec<UiEvent>, Arc<FakeServices>, Arc<InMemoryCredentialStore>) {
        let services = Arc::new(services);
        let credentials = Arc::new(InMemoryCredentialStore::new(key));
        let shell = ChatShell::new(services.clone(), credentials.clone());
        let mut events = Vec::new();
        shell.handle(request, |event| events.push(event)).await;
        (events, services, credentials)
    }

    fn send(text: &str) -> UiRequest {
        UiRequest::SendMessage { text: text.to_string(), model: ModelId::new("qwen/qwen3-coder:free") }
    }

    #[tokio::test]
    async fn test_send_message_success_sequence() {
        let (actual, services, _) = run(FakeServices::new(), "sk-or-test", send("loops?")).await;

        let expected = vec![
            UiEvent::AddMessage { role: Role::User, content: "loops?".to_string(), model: None },
            UiEvent::ShowLoading,
            UiEvent::HideLoading,
            UiEvent::AddMessage {
                role: Role::Assistant,
                content: "Use a for loop.".to_string(),
                model: Some(ModelId::new("qwen/qwen3-coder:free")),
            },
        ];
        assert_eq!(actual, expected);
        assert_eq!(services.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_without_key() {
        let (actual, services, _) = run(FakeServices::new(), "", send("loops?")).await;

        assert_eq!(
            actual[2..],
            [
                UiEvent::ShowError("Please set your OpenRouter API key in Settings.".to_string()),
                UiEvent::HideLoading,
            ]
        );
        assert!(services.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_message_failure() {
        let mut services = FakeServices::new();
        services.reply = Err(CompletionError::Timeout);

        let (actual, _, _) = run(services, "sk-or-test", send("loops?")).await;

        assert_eq!(
            actual[2..],
            [
                UiEvent::HideLoading,
                UiEvent::ShowError(
                    "Error: Request timeout - the model is taking too long to respond".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_api_key() {
        let request = UiRequest::SetApiKey("sk-or-new".to_string());
        let (actual, _, credentials) = run(FakeServices::new(), "", request).await;

        assert_eq!(actual, vec![UiEvent::ApiKeySaved]);
        assert_eq!(credentials.get_key(), "sk-or-new");
    }

    #[tokio::test]
    async fn test_load_models() {
        let (actual, _, _) = run(FakeServices::new(), "", UiRequest::LoadModels).await;

        assert_eq!(
            actual,
            vec![UiEvent::ModelsLoaded(vec![ModelDescriptor::new(
                "qwen/qwen3-coder:free",
                "Qwen3 Coder (free)"
            )])]
        );
    }

    #[tokio::test]
    async fn test_load_models_uses_cache_and_reload_refreshes() {
        let (_, services, _) = run(FakeServices::new(), "", UiRequest::LoadModels).await;
        assert_eq!(*services.catalog_calls.lock().unwrap(), vec!["list"]);

        let (actual, services, _) = run(FakeServices::new(), "", UiRequest::ReloadModels).await;

        assert_eq!(*services.catalog_calls.lock().unwrap(), vec!["refresh"]);
        assert_eq!(
            actual,
            vec![UiEvent::ModelsLoaded(vec![ModelDescriptor::new(
                "qwen/qwen3-coder:free",
                "Qwen3 Coder (free)"
            )])]
        );
    }

    #[tokio::test]
    async fn test_reload_models_failure() {
        let mut services = FakeServices::new();
        services.models = Err(CatalogError::Empty);

        let (actual, _, _) = run(services, "", UiRequest::ReloadModels).await;

        assert_eq!(actual.len(), 1);
        assert!(matches!(
            &actual[0],
            UiEvent::ShowError(message) if message.starts_with("Failed to load models: ")
        ));
    }

    #[tokio::test]
    async fn test_load_models_failure() {
        let mut services = FakeServices::new();
        services.models = Err(CatalogError::Timeout);

        let (actual, _, _) = run(services, "", UiRequest::LoadModels).await;

        assert_eq!(
            actual,
            vec![UiEvent::ShowError(
                "Failed to load models: Connection timeout - the model catalog is taking too long to respond"
                    .to_string()
            )]
        );
    }
}
