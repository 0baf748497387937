use std::sync::Arc;

use tracing::{info, warn};

use super::config::EmbeddingConfig;
use super::error::EmbeddingResult;
use super::http::HttpEmbedder;
use super::provider::EmbeddingProvider;
use super::stub::StubEmbedder;

/// Builds the provider selected by `config`.
pub fn build_provider(config: &EmbeddingConfig) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    config.validate()?;

    match &config.base_url {
        Some(url) => {
            info!(url = %url, model = %config.model, "Using HTTP embedding provider");
            Ok(Arc::new(HttpEmbedder::from_config(config)?))
        }
        None => {
            warn!(
                dim = config.stub_dim,
                "No TAXOMATCH_EMBEDDING_URL configured, running embedder in stub mode"
            );
            Ok(Arc::new(StubEmbedder::new(config.stub_dim)?))
        }
    }
}
