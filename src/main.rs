//! Taxomatch batch entrypoint.
//!
//! Reads a taxonomy and a skills file, maps every skill, and writes JSON Lines records.
//! All settings come from `TAXOMATCH_*` environment variables.

use anyhow::{Context, bail};
use tokio::signal;

use taxomatch::config::Config;
use taxomatch::embedding::{EmbeddingConfig, build_provider};
use taxomatch::mapping::SkillMapper;
use taxomatch::storage::{load_skills, load_taxonomy, save_taxonomy, write_records};
use taxomatch::taxonomy::{PrecomputeMode, precompute_embeddings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let embedding_config = EmbeddingConfig::from_env()?;
    let provider = build_provider(&embedding_config)?;

    tracing::info!(
        taxonomy = %config.taxonomy_path.display(),
        skills = %config.skills_path.display(),
        provider = provider.name(),
        top_n = config.top_n,
        policy = ?config.policy,
        concurrency = config.concurrency,
        "Taxomatch starting"
    );

    let mut tree = load_taxonomy(&config.taxonomy_path)
        .await
        .context("failed to load taxonomy")?
        .tree;

    let issues = tree.validate();
    if !issues.is_empty() {
        tracing::warn!(issues = issues.len(), "Taxonomy has structural problems; continuing");
    }

    if config.precompute {
        let report = precompute_embeddings(&mut tree, provider.as_ref(), PrecomputeMode::IfAbsent).await;
        tracing::info!(
            computed = report.computed,
            skipped = report.skipped,
            failed = report.failed,
            "Taxonomy embeddings precomputed"
        );
        if let Some(ref path) = config.snapshot_path {
            save_taxonomy(path, &tree)
                .await
                .context("failed to save taxonomy snapshot")?;
        }
    }

    let skills = load_skills(&config.skills_path)
        .await
        .context("failed to load skills")?;

    let mapper = SkillMapper::new(provider, config.match_options())?.with_concurrency(config.concurrency)?;

    let outcome = tokio::select! {
        outcome = mapper.map_skills(&skills, &tree) => outcome,
        _ = signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, aborting before output is written");
            bail!("interrupted");
        }
    };

    write_records(&config.output_path, &outcome.records)
        .await
        .context("failed to write match records")?;

    for failure in &outcome.failures {
        tracing::error!(skill_id = %failure.skill_id, "{failure}");
    }

    tracing::info!(
        skills = skills.len(),
        records = outcome.records.len(),
        failures = outcome.failures.len(),
        unmatched = outcome.unmatched,
        output = %config.output_path.display(),
        "Taxomatch finished"
    );

    Ok(())
}
