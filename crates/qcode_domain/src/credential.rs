use std::sync::{PoisonError, RwLock};

/// Storage for the provider API key.
///
/// Reads are synchronous and never fail: an unset key reads as an empty
/// string.
pub trait CredentialStore: Send + Sync + 'static {
    fn get_key(&self) -> String;
    fn set_key(&self, key: &str) -> anyhow::Result<()>;

    fn has_key(&self) -> bool {
        !self.get_key().trim().is_empty()
    }
}

/// Process-local credential store, used when nothing should touch disk.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    key: RwLock<String>,
}

impl InMemoryCredentialStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: RwLock::new(key.into()) }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get_key(&self) -> String {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_key(&self, key: &str) -> anyhow::Result<()> {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = key.trim().to_string();
        Ok(())
    }
}
