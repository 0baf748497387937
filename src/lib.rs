//! Taxomatch library crate (used by the binary, demos and integration tests).
//!
//! Places free-text skill statements into a hierarchical taxonomy by cosine similarity between
//! the skill's embedding and the precomputed embeddings held on taxonomy nodes.
//!
//! # Public API Surface
//!
//! ## Taxonomy
//! - [`TaxonomyTree`], [`TaxonomyNode`] - Tagged tree with ordered children
//! - [`TaxonomyRow`] - Flat `(id, description)` rows for building a tree
//! - [`precompute_embeddings`], [`PrecomputeMode`] - Build-stage node embedding
//!
//! ## Search
//! - [`prune_and_search`] - Rank top-level branches, search the best `top_n` in full
//! - [`search_subtree`] - Iterative pre-order scan of one subtree
//! - [`MatchPolicy`] - Best match or relative threshold band
//!
//! ## Mapping
//! - [`SkillMapper`] - Embeds skills and emits [`MatchRecord`]s in input order
//!
//! ## Embedding
//! - [`EmbeddingProvider`] - Text to vector seam
//! - [`StubEmbedder`], [`HttpEmbedder`] - Deterministic and OpenAI-compatible providers
//!
//! ## I/O and configuration
//! - [`storage`] - Taxonomy, skills and JSON Lines record files
//! - [`Config`], [`EmbeddingConfig`] - `TAXOMATCH_*` environment settings
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod mapping;
pub mod scoring;
pub mod search;
pub mod storage;
pub mod taxonomy;

pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_THRESHOLD_RATIO, DEFAULT_TOP_N, DimValidationError, SENTINEL_SCORE,
    validate_embedding_dim,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbeddingConfig, EmbeddingError, EmbeddingProvider, HttpEmbedder, StubEmbedder,
    build_provider,
};
pub use mapping::{
    FailureKind, MappingError, MappingOutcome, MatchOptions, MatchRecord, Skill, SkillFailure,
    SkillMapper,
};
pub use scoring::{ScoringError, cosine_similarity, try_cosine_similarity};
pub use search::{
    MatchPolicy, PrunedSearch, ScoredNode, SearchError, SearchMode, prune_and_search,
    search_subtree,
};
pub use storage::{
    LoadedTaxonomy, StorageError, TaxonomyFormat, load_skills, load_taxonomy, save_taxonomy,
    write_records,
};
pub use taxonomy::{
    PrecomputeMode, PrecomputeReport, StructuralTaxonomyError, TaxonomyError, TaxonomyNode,
    TaxonomyRow, TaxonomyTree, precompute_embeddings,
};
