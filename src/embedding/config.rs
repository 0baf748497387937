use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_STUB_EMBEDDING_DIM;

use super::error::{EmbeddingError, EmbeddingResult};

/// Default model name sent to the embeddings endpoint.
pub const DEFAULT_EMBEDDING_MODEL: &str = "msmarco-distilbert-base-v4";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of attempts per request.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Configuration for choosing and building an [`EmbeddingProvider`](super::EmbeddingProvider).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API (`{base_url}/embeddings`). `None` selects the stub.
    pub base_url: Option<String>,
    /// Model name sent with every request.
    pub model: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per request (1 disables retries).
    pub max_retries: usize,
    /// Expected output dimension; responses of another length are rejected.
    pub expected_dim: Option<usize>,
    /// Dimension of stub vectors.
    pub stub_dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            expected_dim: None,
            stub_dim: DEFAULT_STUB_EMBEDDING_DIM,
        }
    }
}

impl EmbeddingConfig {
    pub const ENV_URL: &'static str = "TAXOMATCH_EMBEDDING_URL";
    pub const ENV_MODEL: &'static str = "TAXOMATCH_EMBEDDING_MODEL";
    pub const ENV_API_KEY: &'static str = "TAXOMATCH_EMBEDDING_API_KEY";
    pub const ENV_TIMEOUT_SECS: &'static str = "TAXOMATCH_EMBEDDING_TIMEOUT_SECS";
    pub const ENV_MAX_RETRIES: &'static str = "TAXOMATCH_EMBEDDING_MAX_RETRIES";
    pub const ENV_DIM: &'static str = "TAXOMATCH_EMBEDDING_DIM";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> EmbeddingResult<Self> {
        let defaults = Self::default();

        let base_url = non_empty_var(Self::ENV_URL);
        let model = non_empty_var(Self::ENV_MODEL).unwrap_or(defaults.model);
        let api_key = non_empty_var(Self::ENV_API_KEY);
        let timeout = parse_var::<u64>(Self::ENV_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let max_retries = parse_var::<usize>(Self::ENV_MAX_RETRIES)?.unwrap_or(defaults.max_retries);
        let expected_dim = parse_var::<usize>(Self::ENV_DIM)?;
        let stub_dim = expected_dim.unwrap_or(defaults.stub_dim);

        let config = Self {
            base_url,
            model,
            api_key,
            timeout,
            max_retries,
            expected_dim,
            stub_dim,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a config for an HTTP endpoint.
    pub fn http(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config with the given dimension.
    pub fn stub(dim: usize) -> Self {
        Self {
            stub_dim: dim,
            ..Default::default()
        }
    }

    /// Returns `true` if no endpoint is configured.
    pub fn is_stub(&self) -> bool {
        self.base_url.is_none()
    }

    pub fn validate(&self) -> EmbeddingResult<()> {
        if let Some(url) = &self.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("embedding URL must be http(s), got '{url}'"),
            });
        }
        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model name cannot be empty".to_string(),
            });
        }
        if self.max_retries == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_retries must be at least 1".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "timeout must be non-zero".to_string(),
            });
        }
        if self.stub_dim == 0 || self.expected_dim == Some(0) {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding dimension must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> EmbeddingResult<Option<T>> {
    match non_empty_var(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| EmbeddingError::InvalidConfig {
                reason: format!("{name} has invalid value '{value}'"),
            }),
        None => Ok(None),
    }
}
