use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Dimensionality of `text-embedding-3-small` vectors.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables read by [`EmbeddingConfig::apply_env`].
pub const ENV_ENDPOINT: &str = "CINEMATCH_EMBEDDING_ENDPOINT";
pub const ENV_MODEL: &str = "CINEMATCH_EMBEDDING_MODEL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Older deployments store the key under this name.
pub const ENV_API_KEY_LEGACY: &str = "openai_apikey";

/// Embedding provider configuration.
///
/// Built explicitly and handed to the client at construction; there is no
/// process-wide provider state.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// API base URL; requests go to `{endpoint}/embeddings`.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Expected vector dimensionality.
    pub dimensions: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token.
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl EmbeddingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the expected dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default config file location: `<config_dir>/cinematch/embedding.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cinematch").join("embedding.json"))
    }

    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> ProviderResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Resolves the effective configuration: defaults, then the given file
    /// (or the default file if it exists), then environment overrides.
    pub fn load(path: Option<&Path>) -> ProviderResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        Ok(config.apply_env(|key| std::env::var(key).ok()))
    }

    /// Applies overrides from `lookup`, normally `std::env::var`.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.model = model;
        }
        if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_API_KEY_LEGACY)) {
            self.api_key = Some(key);
        }
        self
    }

    /// Checks the fields needed to build a client.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ProviderError::Config("endpoint must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ProviderError::Config("model must not be empty".into()));
        }
        if self.dimensions == 0 {
            return Err(ProviderError::Config("dimensions must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ProviderError::Config("timeout must be positive".into()));
        }
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(ProviderError::Config(format!(
                "missing API key (set {ENV_API_KEY})"
            )));
        }
        Ok(())
    }
}
