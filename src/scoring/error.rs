use thiserror::Error;

/// Reasons two vectors cannot be compared.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("cannot score an empty vector")]
    EmptyVector,

    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot score a zero-norm vector")]
    ZeroNorm,

    #[error("similarity is not finite (vector contains NaN or infinity)")]
    NonFinite,
}
