use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD_RATIO;

use super::error::{SearchError, SearchResult};
use super::searcher::first_best;
use super::types::{ScoredNode, SearchMode};

/// How scored results are reduced to matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Exactly one match: the highest score (first encountered wins ties).
    BestMatch,
    /// Every result scoring at least `ratio` times the best score, best first.
    ThresholdBand { ratio: f32 },
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::ThresholdBand {
            ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

impl MatchPolicy {
    pub fn threshold_band(ratio: f32) -> SearchResult<Self> {
        let policy = Self::ThresholdBand { ratio };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> SearchResult<()> {
        match *self {
            Self::BestMatch => Ok(()),
            Self::ThresholdBand { ratio } if ratio > 0.0 && ratio <= 1.0 => Ok(()),
            Self::ThresholdBand { ratio } => Err(SearchError::InvalidRatio { ratio }),
        }
    }

    /// The subtree scan mode this policy needs.
    pub fn search_mode(&self) -> SearchMode {
        match self {
            Self::BestMatch => SearchMode::SingleBest,
            Self::ThresholdBand { .. } => SearchMode::AllMatches,
        }
    }

    /// Reduces `results` (in traversal order) to the final matches.
    pub fn select<'a>(&self, results: Vec<ScoredNode<'a>>) -> Vec<ScoredNode<'a>> {
        match *self {
            Self::BestMatch => first_best(results).into_iter().collect(),
            Self::ThresholdBand { ratio } => select_band(results, ratio),
        }
    }
}

fn select_band(results: Vec<ScoredNode<'_>>, ratio: f32) -> Vec<ScoredNode<'_>> {
    let Some(max_score) = results.iter().map(|r| r.score).reduce(f32::max) else {
        return Vec::new();
    };

    // A negative best score times a ratio < 1 lands above the best score itself.
    let cutoff = (max_score * ratio).min(max_score);

    let mut band: Vec<ScoredNode<'_>> = results.into_iter().filter(|r| r.score >= cutoff).collect();
    band.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    band
}

impl FromStr for MatchPolicy {
    type Err = SearchError;

    /// Parses `best` / `threshold` (ratio defaults to [`DEFAULT_THRESHOLD_RATIO`]).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" | "best-match" | "best_match" => Ok(Self::BestMatch),
            "threshold" | "threshold-band" | "threshold_band" | "band" => Ok(Self::default()),
            _ => Err(SearchError::UnknownPolicy {
                value: s.to_string(),
            }),
        }
    }
}
