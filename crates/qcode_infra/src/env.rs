use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context as _;
use qcode_domain::{
    CatalogConfig, DispatchConfig, Environment, EnvironmentService, ModelId, DEFAULT_MODEL,
    DEFAULT_PROVIDER_URL,
};
use tracing::warn;
use url::Url;

pub struct QCodeEnvironmentService {
    base_path: Option<PathBuf>,
}

impl Default for QCodeEnvironmentService {
    fn default() -> Self {
        Self::new()
    }
}

impl QCodeEnvironmentService {
    /// Loads `.env` from the working directory before anything reads the
    /// environment.
    pub fn new() -> Self {
        dotenv::dotenv().ok();
        Self { base_path: None }
    }

    /// Stores logs and configuration under `path` instead of the user's
    /// config directory.
    pub fn with_base_path(path: impl Into<PathBuf>) -> Self {
        dotenv::dotenv().ok();
        Self { base_path: Some(path.into()) }
    }

    /// Directory for log files. Resolvable before the rest of the
    /// environment so logging can capture warnings about bad settings.
    pub fn log_path(&self) -> PathBuf {
        Environment::log_path_in(&self.base_path())
    }

    fn base_path(&self) -> PathBuf {
        self.base_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|a| a.join("qcode"))
                .unwrap_or(PathBuf::from(".").join(".qcode"))
        })
    }

    fn get(&self) -> anyhow::Result<Environment> {
        let cwd = std::env::current_dir().unwrap_or(PathBuf::from("."));
        let base_path = self.base_path();

        let defaults = CatalogConfig::default();
        let catalog = CatalogConfig {
            ttl: Duration::from_secs(parse_var("QCODE_CATALOG_TTL_SECS", defaults.ttl.as_secs())),
            max_models: parse_var("QCODE_CATALOG_MAX_MODELS", defaults.max_models),
            timeout: Duration::from_secs(parse_var(
                "QCODE_CATALOG_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
        };
        let dispatch = DispatchConfig {
            timeout: Duration::from_secs(parse_var(
                "QCODE_COMPLETION_TIMEOUT_SECS",
                DispatchConfig::default().timeout.as_secs(),
            )),
        };

        let default_model = std::env::var("QCODE_DEFAULT_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .map(|model| ModelId::new(model.trim()))
            .unwrap_or_else(|| ModelId::new(DEFAULT_MODEL));

        Ok(Environment {
            os: std::env::consts::OS.to_string(),
            cwd,
            base_path,
            provider_url: provider_url()?,
            default_model,
            catalog,
            dispatch,
        })
    }
}

impl EnvironmentService for QCodeEnvironmentService {
    fn get_environment(&self) -> anyhow::Result<Environment> {
        self.get()
    }
}

/// Reads the provider URL, making sure it ends with a slash so relative
/// endpoint paths join below it rather than replacing its last segment.
fn provider_url() -> anyhow::Result<Url> {
    let default = || {
        Url::parse(DEFAULT_PROVIDER_URL)
            .with_context(|| format!("Invalid default provider URL: {DEFAULT_PROVIDER_URL}"))
    };
    let Ok(raw) = std::env::var("QCODE_PROVIDER_URL") else {
        return default();
    };

    let raw = raw.trim();
    let raw = if raw.ends_with('/') { raw.to_string() } else { format!("{raw}/") };
    match Url::parse(&raw) {
        Ok(url) => Ok(url),
        Err(error) => {
            warn!(value = %raw, error = %error, "Ignoring invalid QCODE_PROVIDER_URL");
            default()
        }
    }
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(name = name, value = %value, "Ignoring invalid number, using default");
            default
        }),
        Err(_) => default,
    }
}
