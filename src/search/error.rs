use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("threshold ratio must be in (0, 1], got {ratio}")]
    InvalidRatio { ratio: f32 },

    #[error("unknown match policy '{value}' (expected 'best' or 'threshold')")]
    UnknownPolicy { value: String },
}

pub type SearchResult<T> = Result<T, SearchError>;
