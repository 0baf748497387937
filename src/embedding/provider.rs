use async_trait::async_trait;

use super::error::EmbeddingResult;

#[async_trait]
/// Turns text into a fixed-length vector.
///
/// Implementations must be deterministic for a given model version and safe to call
/// concurrently. Timeouts are the implementation's concern; a failure must come back as an
/// error, never as a hang.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Output dimension, when known up front.
    fn embedding_dim(&self) -> Option<usize> {
        None
    }

    /// Short name for logs.
    fn name(&self) -> &str;
}
