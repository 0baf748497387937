use super::*;
use crate::embedding::{EmbeddingError, EmbeddingProvider, EmbeddingResult, MockEmbedder, StubEmbedder};
use crate::search::{MatchPolicy, SearchError};
use crate::taxonomy::{TaxonomyNode, TaxonomyTree};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

fn scenario_tree() -> TaxonomyTree {
    TaxonomyTree::from_branches([
        TaxonomyNode::new("1", "Safety")
            .with_embedding(vec![1.0, 0.0])
            .with_child(TaxonomyNode::new("1", "Hazard awareness").with_embedding(vec![0.9, 0.1])),
        TaxonomyNode::new("2", "Tools").with_embedding(vec![0.0, 1.0]),
    ])
}

fn scenario_provider() -> MockEmbedder {
    MockEmbedder::new()
        .with_vector("Identify site hazards", vec![0.9, 0.1])
        .with_vector("Use a torque wrench", vec![0.05, 1.0])
        .with_failure("Network down")
}

/// Answers after a delay that shrinks with each call, so later skills finish first.
struct SlowFirstEmbedder {
    inner: MockEmbedder,
    delays_ms: parking_lot::Mutex<Vec<u64>>,
}

#[async_trait]
impl EmbeddingProvider for SlowFirstEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let delay = self.delays_ms.lock().pop().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.embed(text).await
    }

    fn name(&self) -> &str {
        "slow-first"
    }
}

#[tokio::test]
async fn test_best_match_scenario() {
    let mapper = SkillMapper::new(
        Arc::new(scenario_provider()),
        MatchOptions::new(2, MatchPolicy::BestMatch),
    )
    .unwrap();

    let skills = vec![Skill::new("s1", "Identify site hazards")];
    let outcome = mapper.map_skills(&skills, &scenario_tree()).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.skill_id, "s1");
    assert_eq!(record.skill_text, "Identify site hazards");
    assert_eq!(record.matched_taxonomy_id, "1.1");
    assert_eq!(record.matched_node_description, "Hazard awareness");
    assert!(record.similarity_score > 0.99);
}

#[tokio::test]
async fn test_threshold_band_emits_multiple_records() {
    let mapper = SkillMapper::new(
        Arc::new(scenario_provider()),
        MatchOptions::new(2, MatchPolicy::threshold_band(0.9).unwrap()),
    )
    .unwrap();

    let skills = vec![Skill::new("s1", "Identify site hazards")];
    let outcome = mapper.map_skills(&skills, &scenario_tree()).await;

    let ids: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.matched_taxonomy_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1.1", "1"]);
    assert!(outcome.records.iter().all(|r| r.skill_id == "s1"));
}

#[tokio::test]
async fn test_provider_failure_is_isolated() {
    let mapper = SkillMapper::new(
        Arc::new(scenario_provider()),
        MatchOptions::new(3, MatchPolicy::BestMatch),
    )
    .unwrap();

    let skills = vec![
        Skill::new("s1", "Identify site hazards"),
        Skill::new("s2", "Network down"),
        Skill::new("s3", "Use a torque wrench"),
    ];
    let outcome = mapper.map_skills(&skills, &scenario_tree()).await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].skill_id, "s1");
    assert_eq!(outcome.records[1].skill_id, "s3");
    assert_eq!(outcome.records[1].matched_taxonomy_id, "2");

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].skill_id, "s2");
    assert_eq!(outcome.failures[0].kind, FailureKind::ProviderFailure);
    assert_eq!(outcome.failed_skill_ids(), vec!["s2"]);
    assert!(!outcome.is_complete());
}

#[tokio::test]
async fn test_concurrent_mapping_preserves_input_order() {
    let provider = SlowFirstEmbedder {
        inner: MockEmbedder::new().with_stub_fallback(2),
        // Popped from the back: first call waits longest.
        delays_ms: parking_lot::Mutex::new(vec![0, 10, 20, 40, 80]),
    };
    let mapper = SkillMapper::new(Arc::new(provider), MatchOptions::new(2, MatchPolicy::BestMatch))
        .unwrap()
        .with_concurrency(5)
        .unwrap();

    let skills: Vec<Skill> = (0..5)
        .map(|i| Skill::new(format!("s{i}"), format!("skill number {i}")))
        .collect();
    let outcome = mapper.map_skills(&skills, &scenario_tree()).await;

    let order: Vec<&str> = outcome.records.iter().map(|r| r.skill_id.as_str()).collect();
    assert_eq!(order, vec!["s0", "s1", "s2", "s3", "s4"]);
}

#[tokio::test]
async fn test_mapping_is_idempotent() {
    let tree = scenario_tree();
    let skills: Vec<Skill> = ["alpha", "beta", "gamma", "delta"]
        .iter()
        .enumerate()
        .map(|(i, t)| Skill::new(i.to_string(), *t))
        .collect();

    let run = || async {
        let mapper = SkillMapper::new(
            Arc::new(StubEmbedder::new(2).unwrap()),
            MatchOptions::new(2, MatchPolicy::threshold_band(0.5).unwrap()),
        )
        .unwrap();
        let outcome = mapper.map_skills(&skills, &tree).await;
        serde_json::to_vec(&outcome.records).unwrap()
    };

    let first = run().await;
    let second = run().await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_include_path() {
    let mapper = SkillMapper::new(
        Arc::new(scenario_provider()),
        MatchOptions::new(1, MatchPolicy::BestMatch).with_path(),
    )
    .unwrap();

    let records = mapper
        .map_skill(&Skill::new("s1", "Identify site hazards"), &scenario_tree())
        .await
        .unwrap();
    assert_eq!(
        records[0].taxonomy_path,
        Some(vec!["Safety".to_string(), "Hazard awareness".to_string()])
    );
}

#[tokio::test]
async fn test_empty_inputs_are_not_errors() {
    let mapper = SkillMapper::new(Arc::new(scenario_provider()), MatchOptions::default()).unwrap();

    let outcome = mapper.map_skills(&[], &scenario_tree()).await;
    assert_eq!(outcome, MappingOutcome::default());

    let skills = vec![Skill::new("s1", "Identify site hazards")];
    let outcome = mapper.map_skills(&skills, &TaxonomyTree::default()).await;
    assert!(outcome.records.is_empty());
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.unmatched, 1);
}

#[tokio::test]
async fn test_map_skill_reports_failure_message() {
    let mapper = SkillMapper::new(Arc::new(MockEmbedder::new()), MatchOptions::default()).unwrap();
    let failure = mapper
        .map_skill(&Skill::new("x", "unknown text"), &scenario_tree())
        .await
        .unwrap_err();
    assert_eq!(failure.skill_id, "x");
    assert!(failure.message.contains("unknown text"));
    assert!(failure.to_string().contains("ProviderFailure"));
}

#[test]
fn test_options_validation() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbedder::new());

    let err = SkillMapper::new(provider.clone(), MatchOptions::new(0, MatchPolicy::BestMatch)).unwrap_err();
    assert!(matches!(err, MappingError::InvalidOptions(SearchError::InvalidTopN)));

    let bad_ratio = MatchOptions::new(3, MatchPolicy::ThresholdBand { ratio: 0.0 });
    assert!(SkillMapper::new(provider.clone(), bad_ratio).is_err());

    let mapper = SkillMapper::new(provider, MatchOptions::default()).unwrap();
    assert!(matches!(
        mapper.with_concurrency(0),
        Err(MappingError::InvalidConcurrency)
    ));
}

#[test]
fn test_skill_deserialization_accepts_legacy_columns() {
    let skills: Vec<Skill> = serde_json::from_str(
        r#"[{"skill_id": 17, "skill": "Operate a forklift"}, {"skill_id": "a-2", "text": "Read blueprints"}]"#,
    )
    .unwrap();
    assert_eq!(skills[0], Skill::new("17", "Operate a forklift"));
    assert_eq!(skills[1], Skill::new("a-2", "Read blueprints"));
}

#[test]
fn test_record_serialization_omits_absent_path() {
    let record = MatchRecord {
        skill_id: "1".into(),
        skill_text: "t".into(),
        matched_node_description: "d".into(),
        matched_taxonomy_id: "1.1".into(),
        similarity_score: 0.5,
        taxonomy_path: None,
    };
    let json = serde_json::to_string(&record).unwrap();
    assert!(!json.contains("taxonomy_path"));
}

#[tokio::test]
async fn test_empty_skill_text_is_provider_failure() {
    let mapper = SkillMapper::new(Arc::new(StubEmbedder::new(2).unwrap()), MatchOptions::default()).unwrap();
    let failure = mapper
        .map_skill(&Skill::new("blank", "  "), &scenario_tree())
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::ProviderFailure);
    assert_eq!(failure.message, EmbeddingError::EmptyText.to_string());
}
