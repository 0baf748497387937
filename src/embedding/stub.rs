use async_trait::async_trait;
use tracing::debug;

use crate::constants::DEFAULT_STUB_EMBEDDING_DIM;

use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;

/// Deterministic embedder for tests and model-free runs.
///
/// Vectors are unit-length pseudo-random values seeded from a BLAKE3 hash of the text, so the
/// same text always embeds identically across runs and platforms. Similar texts are *not*
/// close; only identical texts are.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_STUB_EMBEDDING_DIM,
        }
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> EmbeddingResult<Self> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub embedding dimension must be non-zero".to_string(),
            });
        }
        Ok(Self { dim })
    }

    /// Synchronous form of [`EmbeddingProvider::embed`].
    pub fn embed_sync(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        debug!(text_len = text.len(), "Generating stub embedding");

        let hash = blake3::hash(text.as_bytes());
        let seed_bytes: [u8; 8] = hash.as_bytes()[0..8]
            .try_into()
            .map_err(|_| EmbeddingError::InvalidResponse {
                reason: "BLAKE3 digest shorter than 8 bytes".to_string(),
            })?;
        let mut state = u64::from_le_bytes(seed_bytes);

        let mut embedding = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.embed_sync(text)
    }

    fn embedding_dim(&self) -> Option<usize> {
        Some(self.dim)
    }

    fn name(&self) -> &str {
        "stub"
    }
}
