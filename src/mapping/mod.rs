//! Batch mapping of skills onto the taxonomy.
//!
//! [`SkillMapper`] embeds each skill with the configured
//! [`EmbeddingProvider`](crate::embedding::EmbeddingProvider), runs the pruned search, applies
//! the [`MatchPolicy`](crate::search::MatchPolicy), and emits [`MatchRecord`]s in input order.
//! A skill whose embedding fails becomes a [`SkillFailure`]; the rest of the batch continues.

/// Mapping error types.
pub mod error;
/// Skill mapper.
pub mod mapper;
/// Input/output record types.
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{MappingError, MappingResult};
pub use mapper::SkillMapper;
pub use types::{FailureKind, MappingOutcome, MatchOptions, MatchRecord, Skill, SkillFailure};
