//! Maps two skills onto a small in-memory taxonomy.

use anyhow::Result;

#[cfg(feature = "mock")]
#[tokio::main]
async fn main() -> Result<()> {
    use std::sync::Arc;

    use taxomatch::{MatchOptions, MatchPolicy, MockEmbedder, SkillMapper, Skill, TaxonomyTree};

    let tree = TaxonomyTree::from_legacy_str(
        r#"{"1": {"_description": "Safety", "_embedding": [1, 0],
                  "1": {"_description": "Hazard awareness", "_embedding": [0.9, 0.2]}},
            "2": {"_description": "Tools", "_embedding": [0, 1]}}"#,
    )?
    .0;

    let provider = MockEmbedder::new()
        .with_vector("Identify site hazards", vec![0.9, 0.1])
        .with_vector("Use a torque wrench", vec![0.1, 0.9]);

    let mapper = SkillMapper::new(
        Arc::new(provider),
        MatchOptions::new(2, MatchPolicy::threshold_band(0.95)?).with_path(),
    )?;

    let skills = vec![
        Skill::new("s1", "Identify site hazards"),
        Skill::new("s2", "Use a torque wrench"),
    ];

    let outcome = mapper.map_skills(&skills, &tree).await;
    for record in &outcome.records {
        println!("{}", serde_json::to_string(record)?);
    }

    Ok(())
}

#[cfg(not(feature = "mock"))]
fn main() {
    eprintln!("Run with: cargo run --example map_skills --features mock");
}
