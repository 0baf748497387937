use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::search::prune_and_search;
use crate::taxonomy::TaxonomyTree;

use super::error::{MappingError, MappingResult};
use super::types::{FailureKind, MappingOutcome, MatchOptions, MatchRecord, Skill, SkillFailure};

/// Maps skills onto a taxonomy with a fixed provider and options.
pub struct SkillMapper {
    provider: Arc<dyn EmbeddingProvider>,
    options: MatchOptions,
    concurrency: usize,
}

impl std::fmt::Debug for SkillMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillMapper")
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl SkillMapper {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, options: MatchOptions) -> MappingResult<Self> {
        options.validate()?;
        Ok(Self {
            provider,
            options,
            concurrency: 1,
        })
    }

    /// Embeds up to `concurrency` skills at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> MappingResult<Self> {
        if concurrency == 0 {
            return Err(MappingError::InvalidConcurrency);
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Maps every skill. Records and failures come back in input order.
    pub async fn map_skills(&self, skills: &[Skill], tree: &TaxonomyTree) -> MappingOutcome {
        let total = skills.len();
        if tree.is_empty() {
            warn!("Taxonomy is empty; every skill will be unmatched");
        }

        let results: Vec<Result<Vec<MatchRecord>, SkillFailure>> = stream::iter(skills.iter().enumerate())
            .map(move |(index, skill)| async move {
                info!(
                    skill_id = %skill.skill_id,
                    "Processing skill {}/{}: {}",
                    index + 1,
                    total,
                    skill.text
                );
                self.map_skill(skill, tree).await
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut outcome = MappingOutcome::default();
        for result in results {
            match result {
                Ok(records) if records.is_empty() => outcome.unmatched += 1,
                Ok(records) => outcome.records.extend(records),
                Err(failure) => outcome.failures.push(failure),
            }
        }

        info!(
            skills = total,
            records = outcome.records.len(),
            failures = outcome.failures.len(),
            unmatched = outcome.unmatched,
            "Skill mapping finished"
        );

        outcome
    }

    /// Embeds one skill and matches it; a provider error becomes a [`SkillFailure`].
    pub async fn map_skill(
        &self,
        skill: &Skill,
        tree: &TaxonomyTree,
    ) -> Result<Vec<MatchRecord>, SkillFailure> {
        let query = self.provider.embed(&skill.text).await.map_err(|err| {
            warn!(
                skill_id = %skill.skill_id,
                provider = self.provider.name(),
                error = %err,
                "Embedding provider failed for skill"
            );
            SkillFailure {
                skill_id: skill.skill_id.clone(),
                skill_text: skill.text.clone(),
                kind: FailureKind::ProviderFailure,
                message: err.to_string(),
            }
        })?;

        Ok(self.match_embedding(skill, &query, tree))
    }

    /// Matches an already-embedded skill. Deterministic for a given query and tree.
    pub fn match_embedding(&self, skill: &Skill, query: &[f32], tree: &TaxonomyTree) -> Vec<MatchRecord> {
        let policy = self.options.policy;
        let search = prune_and_search(query, tree, self.options.top_n, policy.search_mode());
        let matches = policy.select(search.results);

        debug!(
            skill_id = %skill.skill_id,
            matches = matches.len(),
            "Selected taxonomy matches"
        );

        matches
            .into_iter()
            .map(|m| MatchRecord {
                skill_id: skill.skill_id.clone(),
                skill_text: skill.text.clone(),
                matched_node_description: m.node.description.clone(),
                taxonomy_path: if self.options.include_path {
                    tree.path_descriptions(&m.id)
                } else {
                    None
                },
                matched_taxonomy_id: m.id,
                similarity_score: m.score,
            })
            .collect()
    }
}
