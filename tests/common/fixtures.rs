use std::path::{Path, PathBuf};

use taxomatch::{MockEmbedder, Skill, TaxonomyNode, TaxonomyRow, TaxonomyTree};

/// Two branches, the first with a nested child, in the legacy reserved-key format.
pub const LEGACY_TAXONOMY: &str = r#"{
    "1": {
        "_description": "Safety",
        "_id": "1",
        "_embedding": [1.0, 0.0],
        "1": {"_description": "Hazard awareness", "_id": "1.1", "_embedding": [0.8, 0.6]}
    },
    "2": {"_description": "Tools", "_id": "2", "_embedding": [0.0, 1.0]}
}"#;

/// The same taxonomy as [`LEGACY_TAXONOMY`], built directly.
pub fn tagged_taxonomy() -> TaxonomyTree {
    TaxonomyTree::from_branches([
        TaxonomyNode::new("1", "Safety")
            .with_id("1")
            .with_embedding(vec![1.0, 0.0])
            .with_child(
                TaxonomyNode::new("1", "Hazard awareness")
                    .with_id("1.1")
                    .with_embedding(vec![0.8, 0.6]),
            ),
        TaxonomyNode::new("2", "Tools").with_id("2").with_embedding(vec![0.0, 1.0]),
    ])
}

/// Spreadsheet-style rows for a three-level taxonomy without embeddings.
pub fn construction_rows() -> Vec<TaxonomyRow> {
    vec![
        TaxonomyRow::new("1", "Electrical"),
        TaxonomyRow::new("1.1", "Wiring"),
        TaxonomyRow::new("1.1.1", "Conduit bending"),
        TaxonomyRow::new("1.2", "Testing"),
        TaxonomyRow::new("2", "Mechanical"),
        TaxonomyRow::new("2.1", "Pumps"),
    ]
}

pub fn sample_skills() -> Vec<Skill> {
    vec![
        Skill::new("s1", "Identify site hazards"),
        Skill::new("s2", "Use a torque wrench"),
        Skill::new("s3", "Spot trip hazards"),
    ]
}

pub fn sample_embedder() -> MockEmbedder {
    MockEmbedder::new()
        .with_vector("Identify site hazards", vec![0.9, 0.1])
        .with_vector("Use a torque wrench", vec![0.1, 0.9])
        .with_vector("Spot trip hazards", vec![0.8, 0.6])
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}
