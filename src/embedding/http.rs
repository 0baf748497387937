use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::validate_embedding_dim;

use super::config::EmbeddingConfig;
use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;

const RETRY_BASE_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF_SHIFT: u32 = 5;

/// Client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_retries: usize,
    expected_dim: Option<usize>,
}

impl HttpEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        config.validate()?;
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: "HTTP embedder requires a base URL".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let auth = HeaderValue::from_str(&format!("Bearer {}", key.trim())).map_err(|_| {
                EmbeddingError::InvalidConfig {
                    reason: "API key contains invalid header characters".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_retries: config.max_retries,
            expected_dim: config.expected_dim,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Embeds several texts in one request; output order matches input order.
    pub async fn embed_batch(&self, inputs: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        if inputs.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::EmptyText);
        }

        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match self.send(inputs).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if is_retryable(&err) && attempt < self.max_retries => {
                    let backoff = retry_backoff(attempt);
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Embedding request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, inputs: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        debug!(endpoint = %self.endpoint, inputs = inputs.len(), "Sending embedding request");

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: EmbeddingResponse = response.json().await?;
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != inputs.len() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "endpoint returned {} embeddings for {} inputs",
                    parsed.data.len(),
                    inputs.len()
                ),
            });
        }

        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|e| e.embedding).collect();
        for vector in &vectors {
            match self.expected_dim {
                Some(expected) => validate_embedding_dim(vector, expected).map_err(|_| {
                    EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    }
                })?,
                None if vector.is_empty() => {
                    return Err(EmbeddingError::InvalidResponse {
                        reason: "endpoint returned an empty embedding".to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "endpoint returned no embedding".to_string(),
        })
    }

    fn embedding_dim(&self) -> Option<usize> {
        self.expected_dim
    }

    fn name(&self) -> &str {
        "http"
    }
}

pub(crate) fn is_retryable(err: &EmbeddingError) -> bool {
    match err {
        EmbeddingError::Request { .. } => true,
        EmbeddingError::Status { status, .. } => StatusCode::from_u16(*status)
            .is_ok_and(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error()),
        _ => false,
    }
}

pub(crate) fn retry_backoff(attempt: usize) -> Duration {
    let shift = (attempt as u32).min(MAX_BACKOFF_SHIFT);
    RETRY_BASE_BACKOFF * (1u32 << shift)
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
