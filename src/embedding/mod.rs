//! Embedding providers.
//!
//! The core only needs `text -> vector`; [`EmbeddingProvider`] is that seam. Providers are
//! constructed explicitly and passed in, never held as global state.
//!
//! - [`StubEmbedder`] produces deterministic vectors without a model (tests, dry runs).
//! - [`HttpEmbedder`] calls an OpenAI-compatible `/embeddings` endpoint.
//! - `MockEmbedder` (feature `mock`) serves fixed vectors and scripted failures.

/// Provider configuration.
pub mod config;
mod error;
/// Provider selection from configuration.
pub mod factory;
/// HTTP provider.
pub mod http;
#[cfg(any(test, feature = "mock"))]
/// Mock provider (enabled with `mock` feature).
pub mod mock;
/// Provider trait.
pub mod provider;
/// Deterministic stub provider.
pub mod stub;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, EmbeddingConfig};
pub use error::{EmbeddingError, EmbeddingResult};
pub use factory::build_provider;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use provider::EmbeddingProvider;
pub use stub::StubEmbedder;
