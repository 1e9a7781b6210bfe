mod policy;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
pub use policy::*;
use qcode_domain::{
    CatalogConfig, CatalogError, Clock, ModelCatalogService, ModelDescriptor, SystemClock,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::open_router::{OpenRouter, OpenRouterModel};

/// Where the raw model listing comes from.
#[async_trait]
pub trait ModelSource: Send + Sync + 'static {
    async fn fetch_models(&self, timeout: Duration) -> Result<Vec<OpenRouterModel>, CatalogError>;
}

#[async_trait]
impl ModelSource for OpenRouter {
    async fn fetch_models(&self, timeout: Duration) -> Result<Vec<OpenRouterModel>, CatalogError> {
        self.models(timeout).await
    }
}

#[derive(Debug, Clone)]
struct CatalogCache {
    models: Vec<ModelDescriptor>,
    fetched_at: Instant,
    invalidated: bool,
}

/// Curated list of free models with a time-bounded cache.
///
/// Within the TTL the cached list is served without touching the network.
/// Once it expires the next caller refreshes it; while a refresh is running
/// other callers wait for it instead of starting their own. When a refresh
/// fails the previous list is served, however old it is.
pub struct ModelCatalog<S, C = SystemClock> {
    source: S,
    clock: Arc<C>,
    config: CatalogConfig,
    policy: CatalogPolicy,
    cache: RwLock<Option<CatalogCache>>,
    refresh: Mutex<()>,
}

impl<S: ModelSource> ModelCatalog<S> {
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }
}

impl<S: ModelSource, C: Clock> ModelCatalog<S, C> {
    pub fn with_clock(source: S, config: CatalogConfig, clock: Arc<C>) -> Self {
        Self {
            source,
            clock,
            config,
            policy: CatalogPolicy::default(),
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub fn policy(mut self, policy: CatalogPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The ranked list, from cache while it is fresh.
    pub async fn list(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        if let Some(models) = self.fresh().await {
            return Ok(models);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(models) = self.fresh().await {
            return Ok(models);
        }

        self.fetch_and_commit().await
    }

    /// Fetches regardless of the cache age. Failures still fall back to the
    /// previous list.
    pub async fn refresh(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        self.invalidate().await;
        self.list().await
    }

    /// Forces the next `list` to refresh while keeping the current entries
    /// available as a fallback.
    pub async fn invalidate(&self) {
        if let Some(cache) = self.cache.write().await.as_mut() {
            cache.invalidated = true;
        }
    }

    async fn fresh(&self) -> Option<Vec<ModelDescriptor>> {
        let cache = self.cache.read().await;
        let cache = cache.as_ref()?;
        let age = self.clock.now().saturating_duration_since(cache.fetched_at);
        if cache.invalidated || age >= self.config.ttl {
            debug!(age_secs = age.as_secs(), "Model catalog expired");
            return None;
        }
        Some(cache.models.clone())
    }

    async fn fetch_and_commit(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        match self.fetch().await {
            Ok(models) => {
                info!(count = models.len(), "Model catalog refreshed");
                *self.cache.write().await = Some(CatalogCache {
                    models: models.clone(),
                    fetched_at: self.clock.now(),
                    invalidated: false,
                });
                Ok(models)
            }
            Err(error) => match self.cache.read().await.as_ref() {
                Some(cache) => {
                    warn!(error = %error, "Failed to refresh model catalog, serving stale entries");
                    Ok(cache.models.clone())
                }
                None => {
                    warn!(error = %error, "Failed to load model catalog");
                    Err(error)
                }
            },
        }
    }

    async fn fetch(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        let raw = self.source.fetch_models(self.config.timeout).await?;
        debug!(count = raw.len(), "Fetched raw model listing");
        let models = self.policy.curate(raw, self.config.max_models);
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(models)
    }
}

#[async_trait]
impl<S: ModelSource, C: Clock> ModelCatalogService for ModelCatalog<S, C> {
    async fn list(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        ModelCatalog::list(self).await
    }

    async fn refresh(&self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        ModelCatalog::refresh(self).await
    }
}
