use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;
use super::stub::StubEmbedder;

/// Scriptable provider: fixed vectors per text, texts that always fail, and a call log.
///
/// Unregistered texts fall back to a [`StubEmbedder`] when one is set, otherwise they fail.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    fallback: Option<StubEmbedder>,
    calls: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    pub fn with_failure(mut self, text: impl Into<String>) -> Self {
        self.failing.insert(text.into());
        self
    }

    pub fn with_stub_fallback(mut self, dim: usize) -> Self {
        self.fallback = StubEmbedder::new(dim).ok();
        self
    }

    /// Texts embedded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.lock().push(text.to_string());

        if self.failing.contains(text) {
            return Err(EmbeddingError::Unavailable {
                reason: format!("scripted failure for '{text}'"),
            });
        }
        if let Some(vector) = self.vectors.get(text) {
            return Ok(vector.clone());
        }
        match &self.fallback {
            Some(stub) => stub.embed_sync(text),
            None => Err(EmbeddingError::Unavailable {
                reason: format!("no vector registered for '{text}'"),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
