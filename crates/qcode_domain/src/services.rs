use crate::{CatalogError, CompletionError, Environment, ModelDescriptor, ModelId};

/// Ranked list of the models a user may pick from.
#[async_trait::async_trait]
pub trait ModelCatalogService: Send + Sync + 'static {
    /// The ranked list, served from cache while it is fresh.
    async fn list(&self) -> Result<Vec<ModelDescriptor>, CatalogError>;

    /// Fetches the list again regardless of the cache age.
    async fn refresh(&self) -> Result<Vec<ModelDescriptor>, CatalogError>;
}

/// Sends one prompt to one model and returns the reply text.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync + 'static {
    async fn send(&self, prompt: &str, model: &ModelId) -> Result<String, CompletionError>;
}

/// Resolves the runtime environment once at startup.
pub trait EnvironmentService: Send + Sync + 'static {
    fn get_environment(&self) -> anyhow::Result<Environment>;
}
