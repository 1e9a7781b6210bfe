use std::path::{Path, PathBuf};

use anyhow::Context as _;
use qcode_domain::CredentialStore;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Environment variable that takes precedence over the stored key.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
const API_KEY_FIELD: &str = "apiKey";

/// Keeps the API key in a JSON settings file shared by every workspace.
/// Other settings in the same file are preserved on write.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_settings(&self) -> anyhow::Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get_key(&self) -> String {
        if let Some(key) = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            debug!("Using API key from {API_KEY_VAR}");
            return key.trim().to_string();
        }

        match self.read_settings() {
            Ok(settings) => settings
                .get(API_KEY_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "Failed to load stored API key");
                String::new()
            }
        }
    }

    fn set_key(&self, key: &str) -> anyhow::Result<()> {
        let mut settings = self.read_settings()?;
        settings.insert(API_KEY_FIELD.to_string(), Value::String(key.trim().to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(settings))?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "API key saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    fn fixture() -> (TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("config.json"));
        (dir, store)
    }

    #[test]
    #[serial]
    fn test_missing_file_reads_empty() {
        env::remove_var(API_KEY_VAR);
        let (_dir, store) = fixture();

        assert_eq!(store.get_key(), "");
        assert!(!store.has_key());
    }

    #[test]
    #[serial]
    fn test_set_key_persists_and_trims() {
        env::remove_var(API_KEY_VAR);
        let (_dir, store) = fixture();

        store.set_key("  sk-or-v1-abc  ").unwrap();

        assert_eq!(store.get_key(), "sk-or-v1-abc");
        let actual: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(actual, serde_json::json!({"apiKey": "sk-or-v1-abc"}));
    }

    #[test]
    #[serial]
    fn test_set_key_preserves_other_settings() {
        env::remove_var(API_KEY_VAR);
        let (_dir, store) = fixture();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"theme": "dark", "apiKey": "old"}"#).unwrap();

        store.set_key("new").unwrap();

        let actual: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(actual, serde_json::json!({"theme": "dark", "apiKey": "new"}));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_stored_key() {
        let (_dir, store) = fixture();
        env::remove_var(API_KEY_VAR);
        store.set_key("stored").unwrap();

        env::set_var(API_KEY_VAR, "from-env");
        let actual = store.get_key();
        env::remove_var(API_KEY_VAR);

        assert_eq!(actual, "from-env");
        assert_eq!(store.get_key(), "stored");
    }

    #[test]
    #[serial]
    fn test_corrupt_file_reads_empty() {
        env::remove_var(API_KEY_VAR);
        let (_dir, store) = fixture();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.get_key(), "");
        assert!(store.set_key("sk").is_err());
    }
}
