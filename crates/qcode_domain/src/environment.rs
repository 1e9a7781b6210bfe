use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_setters::Setters;
use url::Url;

use crate::ModelId;

pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/";
pub const DEFAULT_MODEL: &str = "qwen/qwen3-coder:free";

#[derive(Debug, Setters, Clone)]
#[setters(into)]
/// Represents the environment in which the application is running.
pub struct Environment {
    /// The operating system of the environment.
    pub os: String,
    /// The current working directory.
    pub cwd: PathBuf,
    /// The base path relative to which logs and configuration are stored.
    pub base_path: PathBuf,
    /// Base URL of the OpenAI-compatible provider API.
    pub provider_url: Url,
    /// Model used until the user picks another one.
    pub default_model: ModelId,
    pub catalog: CatalogConfig,
    pub dispatch: DispatchConfig,
}

impl Environment {
    pub fn log_path(&self) -> PathBuf {
        Self::log_path_in(&self.base_path)
    }

    pub fn log_path_in(base_path: &Path) -> PathBuf {
        base_path.join("logs")
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_path.join("config.json")
    }
}

/// Tuning for the model catalog.
#[derive(Debug, Clone, Setters, PartialEq, Eq)]
#[setters(into)]
pub struct CatalogConfig {
    /// How long a fetched catalog is served without hitting the network.
    pub ttl: Duration,
    /// Upper bound on the number of models exposed to callers.
    pub max_models: usize,
    /// Bound on a single catalog request.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_models: 25,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Setters, PartialEq, Eq)]
#[setters(into)]
pub struct DispatchConfig {
    /// Bound on a single completion request.
    pub timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_paths_are_relative_to_base_path() {
        let fixture = Environment {
            os: "linux".to_string(),
            cwd: PathBuf::from("/work"),
            base_path: PathBuf::from("/home/user/.config/qcode"),
            provider_url: Url::parse(DEFAULT_PROVIDER_URL).unwrap(),
            default_model: ModelId::new(DEFAULT_MODEL),
            catalog: CatalogConfig::default(),
            dispatch: DispatchConfig::default(),
        };

        assert_eq!(
            fixture.log_path(),
            PathBuf::from("/home/user/.config/qcode/logs")
        );
        assert_eq!(
            fixture.config_path(),
            PathBuf::from("/home/user/.config/qcode/config.json")
        );
    }

    #[test]
    fn test_catalog_defaults() {
        let actual = CatalogConfig::default();
        assert_eq!(actual.ttl, Duration::from_secs(300));
        assert_eq!(actual.max_models, 25);
        assert_eq!(actual.timeout, Duration::from_secs(10));
    }
}
