use thiserror::Error;

use crate::search::SearchError;

/// Errors that make a whole batch unusable. Per-skill problems are
/// [`SkillFailure`](super::SkillFailure)s instead.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid match options: {0}")]
    InvalidOptions(#[from] SearchError),

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

pub type MappingResult<T> = Result<T, MappingError>;
