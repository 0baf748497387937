use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_TOP_N;
use crate::search::{MatchPolicy, SearchError};

/// A free-text skill statement to place in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(alias = "Skill ID", deserialize_with = "string_or_number")]
    pub skill_id: String,
    #[serde(alias = "skill", alias = "Skill")]
    pub text: String,
}

impl Skill {
    pub fn new(skill_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            text: text.into(),
        }
    }
}

/// One skill-to-node assignment. Under a threshold band a skill may produce several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub skill_id: String,
    pub skill_text: String,
    pub matched_node_description: String,
    pub matched_taxonomy_id: String,
    pub similarity_score: f32,
    /// Descriptions from the top-level branch down to the matched node, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The embedding provider could not embed the skill text.
    ProviderFailure,
}

/// A skill that produced no records because of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFailure {
    pub skill_id: String,
    pub skill_text: String,
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for SkillFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skill {} ({:?}): {}", self.skill_id, self.kind, self.message)
    }
}

/// Records and failures from one batch, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingOutcome {
    pub records: Vec<MatchRecord>,
    pub failures: Vec<SkillFailure>,
    /// Skills that were embedded but matched nothing (empty taxonomy).
    pub unmatched: usize,
}

impl MappingOutcome {
    /// `true` if no skill failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Ids of failed skills, for retrying.
    pub fn failed_skill_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.skill_id.as_str()).collect()
    }
}

/// Search settings applied to every skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Top-level branches searched in full (at least 1).
    pub top_n: usize,
    pub policy: MatchPolicy,
    /// Attach [`MatchRecord::taxonomy_path`].
    pub include_path: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            policy: MatchPolicy::default(),
            include_path: false,
        }
    }
}

impl MatchOptions {
    pub fn new(top_n: usize, policy: MatchPolicy) -> Self {
        Self {
            top_n,
            policy,
            include_path: false,
        }
    }

    pub fn with_path(mut self) -> Self {
        self.include_path = true;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.top_n == 0 {
            return Err(SearchError::InvalidTopN);
        }
        self.policy.validate()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
