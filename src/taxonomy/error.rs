use thiserror::Error;

/// Fatal taxonomy loading errors.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// The document does not contain a taxonomy root at all.
    #[error("taxonomy root is missing or not a mapping")]
    MissingRoot,

    /// A flat row could not be placed in the hierarchy.
    #[error("invalid taxonomy row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("taxonomy JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

/// Non-fatal structural problems found while building or validating a tree.
///
/// These are reported and logged; matching still proceeds with whatever ids and embeddings
/// are present.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralTaxonomyError {
    #[error("duplicate taxonomy id '{id}'")]
    DuplicateId { id: String },

    #[error("id '{id}' does not extend parent id '{parent}'")]
    NotPrefixed { id: String, parent: String },

    #[error("malformed id '{id}': {reason}")]
    MalformedId { id: String, reason: String },

    #[error("duplicate child key '{key}' under '{parent}'")]
    DuplicateKey { key: String, parent: String },

    #[error("embedding of '{id}' has dimension {actual}, tree uses {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed embedding at '{path}': {reason}")]
    MalformedEmbedding { path: String, reason: String },

    #[error("entry '{key}' under '{parent}' is not a node")]
    InvalidChild { key: String, parent: String },
}
