use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed empty text")]
    EmptyText,

    #[error("embedding request failed: {reason}")]
    Request { reason: String },

    #[error("embedding endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding provider unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EmbeddingError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::Request {
                reason: err.to_string(),
            }
        }
    }
}
