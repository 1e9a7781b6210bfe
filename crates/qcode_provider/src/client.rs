use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use qcode_domain::{
    CatalogError, CompletionError, CompletionService, CredentialStore, Environment,
    ModelCatalogService, ModelDescriptor, ModelId,
};
use reqwest::redirect::Policy;

use crate::catalog::ModelCatalog;
use crate::dispatch::CompletionDispatcher;
use crate::open_router::OpenRouter;

/// Catalog and dispatcher sharing one connection pool.
pub struct Client<K> {
    catalog: Arc<ModelCatalog<OpenRouter>>,
    dispatcher: Arc<CompletionDispatcher<K>>,
}

impl<K> Clone for Client<K> {
    fn clone(&self) -> Self {
        Self { catalog: self.catalog.clone(), dispatcher: self.dispatcher.clone() }
    }
}

impl<K: CredentialStore> Client<K> {
    pub fn new(env: &Environment, credentials: Arc<K>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(5)
            .redirect(Policy::limited(10))
            .build()
            .context("Failed to build HTTP client")?;

        let provider = OpenRouter::builder()
            .client(client)
            .base_url(env.provider_url.clone())
            .build()
            .with_context(|| format!("Failed to initialize: {}", env.provider_url))?;

        Ok(Self {
            catalog: Arc::new(ModelCatalog::new(provider.clone(), env.catalog.clone())),
            dispatcher: Arc::new(CompletionDispatcher::new(
                provider,
                credentials,
                env.dispatch.clone(),
            )),
        })
    }
}

#[async_trait::async_trait]
impl<K: CredentialStore> ModelCatalogService for Client<K> {
    async fn list(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        self.catalog.list().await
    }

    async fn refresh(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        self.catalog.refresh().await
    }
}

#[async_trait::async_trait]
impl<K: CredentialStore> CompletionService for Client<K> {
    async fn send(&self, prompt: &str, model: &ModelId) -> Result<String, CompletionError> {
        self.dispatcher.send(prompt, model).await
    }
}
