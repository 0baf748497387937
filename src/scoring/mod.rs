//! Vector similarity scoring.
//!
//! [`cosine_similarity`] is the total form used during tree search: degenerate input never
//! fails, it scores [`SENTINEL_SCORE`](crate::constants::SENTINEL_SCORE). Use
//! [`try_cosine_similarity`] when the reason for a failed comparison matters.

/// Scoring error types.
pub mod error;
/// Cosine similarity functions.
pub mod similarity;


pub use error::ScoringError;
pub use similarity::{cosine_similarity, score_embedding, try_cosine_similarity};
