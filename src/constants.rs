//! Cross-cutting, shared constants.
//!
//! Search defaults mirror the values the mapping pipeline has always run with: three top-level
//! branches examined in full, and a 90% relative band for multi-match output.

/// Number of top-level branches searched to full depth.
pub const DEFAULT_TOP_N: usize = 3;

/// Fraction of the best score a result must reach to stay in a threshold band.
pub const DEFAULT_THRESHOLD_RATIO: f32 = 0.90;

/// Score reported for nodes that cannot be compared (missing or degenerate embedding).
pub const SENTINEL_SCORE: f32 = 0.0;

/// Separator between segments of a dotted taxonomy id (`"1.4.2"`).
pub const ID_SEPARATOR: char = '.';

/// Sole top-level key of a tagged taxonomy snapshot.
pub const TAGGED_ROOT_KEY: &str = "root";

/// Field names a tagged taxonomy node may carry.
pub const TAGGED_NODE_FIELDS: [&str; 5] = ["key", "description", "id", "embedding", "children"];

/// Deepest node level (top level is 0) a tagged snapshot may hold. Each level nests two JSON
/// containers and `serde_json` refuses documents nested past 128.
pub const MAX_SNAPSHOT_DEPTH: usize = 60;

/// Key prefix marking metadata fields in the legacy nested-mapping taxonomy format.
pub const LEGACY_METADATA_PREFIX: &str = "_";

/// Legacy metadata key holding the node label.
pub const LEGACY_DESCRIPTION_KEY: &str = "_description";

/// Legacy metadata key holding the dotted id.
pub const LEGACY_ID_KEY: &str = "_id";

/// Legacy metadata key holding the precomputed embedding.
pub const LEGACY_EMBEDDING_KEY: &str = "_embedding";

/// Dimension produced by the stub embedder (matches the sentence model used upstream).
pub const DEFAULT_STUB_EMBEDDING_DIM: usize = 768;

/// Skills embedded concurrently by default.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Validates an embedding against an expected dimension.
///
/// Returns the offending length on mismatch so callers can log it.
pub fn validate_embedding_dim(embedding: &[f32], expected: usize) -> Result<(), DimValidationError> {
    if embedding.is_empty() {
        return Err(DimValidationError::ZeroDimension);
    }
    if embedding.len() != expected {
        return Err(DimValidationError::Mismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}

/// Errors from embedding dimension validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    /// Embedding has no components.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    /// Embedding length differs from the expected dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Expected number of components.
        expected: usize,
        /// Observed number of components.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_embedding_dim_ok() {
        assert!(validate_embedding_dim(&[0.1, 0.2, 0.3], 3).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_zero() {
        assert_eq!(
            validate_embedding_dim(&[], 3),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(&[1.0, 2.0], 3),
            Err(DimValidationError::Mismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_default_ratio_in_range() {
        assert!(DEFAULT_THRESHOLD_RATIO > 0.0 && DEFAULT_THRESHOLD_RATIO <= 1.0);
        assert!(DEFAULT_TOP_N >= 1);
    }
}
