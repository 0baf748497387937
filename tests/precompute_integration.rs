//! Build-stage tests: rows to tree, embedding precomputation, snapshot round trip.

mod common;

use std::sync::Arc;

use taxomatch::storage::{TaxonomyFormat, load_taxonomy, save_taxonomy};
use taxomatch::{
    MatchOptions, MatchPolicy, MockEmbedder, PrecomputeMode, Skill, SkillMapper, StubEmbedder,
    TaxonomyTree, precompute_embeddings,
};
use tempfile::TempDir;

use common::fixtures::construction_rows;

#[tokio::test]
async fn test_precompute_then_snapshot_round_trip() {
    let mut tree = TaxonomyTree::from_rows(construction_rows()).expect("rows");
    assert_eq!(tree.node_count(), 6);
    assert!(tree.validate().is_empty());

    let provider = StubEmbedder::new(16).expect("stub");
    let report = precompute_embeddings(&mut tree, &provider, PrecomputeMode::IfAbsent).await;
    assert_eq!(report.computed, 6);
    assert_eq!(report.failed, 0);
    assert!(tree.walk().all(|r| r.node.has_valid_embedding()));

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("taxonomy.json");
    save_taxonomy(&path, &tree).await.expect("save");

    let loaded = load_taxonomy(&path).await.expect("load");
    assert_eq!(loaded.format, TaxonomyFormat::Tagged);
    assert_eq!(loaded.tree, tree);
}

#[tokio::test]
async fn test_precompute_is_idempotent() {
    let mut tree = TaxonomyTree::from_rows(construction_rows()).expect("rows");
    let provider = MockEmbedder::new().with_stub_fallback(8);

    precompute_embeddings(&mut tree, &provider, PrecomputeMode::IfAbsent).await;
    let calls_after_first = provider.call_count();
    assert_eq!(calls_after_first, 6);
    let snapshot = tree.clone();

    let report = precompute_embeddings(&mut tree, &provider, PrecomputeMode::IfAbsent).await;
    assert_eq!(report.computed, 0);
    assert_eq!(report.skipped, 6);
    assert_eq!(provider.call_count(), calls_after_first);
    assert_eq!(tree, snapshot);
}

#[tokio::test]
async fn test_precompute_uses_ancestor_context() {
    let mut tree = TaxonomyTree::from_rows(construction_rows()).expect("rows");
    let provider = MockEmbedder::new().with_stub_fallback(8);

    precompute_embeddings(&mut tree, &provider, PrecomputeMode::IfAbsent).await;

    let calls = provider.calls();
    assert!(calls.contains(&"Electrical Wiring Conduit bending".to_string()));
    assert!(calls.contains(&"Mechanical Pumps".to_string()));
}

#[tokio::test]
async fn test_skill_text_equal_to_context_matches_that_node() {
    let mut tree = TaxonomyTree::from_rows(construction_rows()).expect("rows");
    let provider = Arc::new(StubEmbedder::new(64).expect("stub"));
    precompute_embeddings(&mut tree, provider.as_ref(), PrecomputeMode::IfAbsent).await;

    let mapper = SkillMapper::new(
        provider,
        MatchOptions::new(2, MatchPolicy::BestMatch),
    )
    .expect("mapper");

    let records = mapper
        .map_skill(&Skill::new("k1", "Electrical Wiring Conduit bending"), &tree)
        .await
        .expect("mapped");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].matched_taxonomy_id, "1.1.1");
    assert!((records[0].similarity_score - 1.0).abs() < 1e-5);
}
