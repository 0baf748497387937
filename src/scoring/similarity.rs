use tracing::warn;

use crate::constants::SENTINEL_SCORE;

use super::error::ScoringError;

/// Cosine similarity, `(a·b) / (‖a‖‖b‖)`, with every degenerate case classified.
///
/// Equivalent to `1 - cosine_distance(a, b)`. The result is not clamped.
pub fn try_cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.is_empty() || b.is_empty() {
        return Err(ScoringError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&av, &bv)| {
                let av = f64::from(av);
                let bv = f64::from(bv);
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ScoringError::ZeroNorm);
    }

    let similarity = (dot / (norm_a * norm_b)) as f32;
    if !similarity.is_finite() {
        return Err(ScoringError::NonFinite);
    }

    Ok(similarity)
}

/// Cosine similarity that never fails; degenerate input scores [`SENTINEL_SCORE`].
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    try_cosine_similarity(a, b).unwrap_or(SENTINEL_SCORE)
}

/// Scores a query against a node embedding that may be absent.
///
/// Missing or degenerate embeddings are logged and score [`SENTINEL_SCORE`]; the caller keeps
/// traversing.
pub fn score_embedding(query: &[f32], embedding: Option<&[f32]>, label: &str) -> f32 {
    let Some(embedding) = embedding else {
        warn!(node = label, "No embedding found for node; scoring as 0");
        return SENTINEL_SCORE;
    };

    match try_cosine_similarity(query, embedding) {
        Ok(score) => score,
        Err(err) => {
            warn!(node = label, error = %err, "Cannot score node; scoring as 0");
            SENTINEL_SCORE
        }
    }
}
