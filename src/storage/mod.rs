//! File I/O for taxonomies, skills and match records.
//!
//! Taxonomies are JSON, either the tagged `{"root": {...}}` snapshot written by
//! [`save_taxonomy`] or the legacy nested mapping with `_`-prefixed metadata keys. Skills are a
//! JSON array. Records are written as JSON Lines.

pub mod error;


pub use error::{StorageError, StorageResult};

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::constants::{MAX_SNAPSHOT_DEPTH, TAGGED_ROOT_KEY};
use crate::mapping::{MatchRecord, Skill};
use crate::taxonomy::{StructuralTaxonomyError, TaxonomyError, TaxonomyTree, is_legacy_document};

/// On-disk layout a taxonomy was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyFormat {
    Tagged,
    Legacy,
}

/// A taxonomy read from disk, with any problems found while converting it.
#[derive(Debug, Clone)]
pub struct LoadedTaxonomy {
    pub tree: TaxonomyTree,
    pub format: TaxonomyFormat,
    /// Non-fatal conversion problems (legacy format only).
    pub warnings: Vec<StructuralTaxonomyError>,
}

/// Reads a taxonomy, detecting the tagged or legacy format.
///
/// A tagged snapshot is a document whose only key is `root`; see
/// [`is_legacy_document`]. Unknown fields in a tagged snapshot are an error.
pub async fn load_taxonomy(path: impl AsRef<Path>) -> StorageResult<LoadedTaxonomy> {
    let path = path.as_ref();
    let value: Value = read_json(path).await?;
    let taxonomy_err = |source: TaxonomyError| StorageError::Taxonomy {
        path: path.to_path_buf(),
        source,
    };

    let loaded = if is_legacy_document(&value) {
        let (tree, warnings) = TaxonomyTree::from_legacy_json(&value).map_err(taxonomy_err)?;
        LoadedTaxonomy {
            tree,
            format: TaxonomyFormat::Legacy,
            warnings,
        }
    } else {
        if !value.get(TAGGED_ROOT_KEY).is_some_and(Value::is_object) {
            return Err(taxonomy_err(TaxonomyError::MissingRoot));
        }
        let tree: TaxonomyTree =
            serde_json::from_value(value).map_err(|e| taxonomy_err(TaxonomyError::Json(e)))?;
        LoadedTaxonomy {
            tree,
            format: TaxonomyFormat::Tagged,
            warnings: Vec::new(),
        }
    };

    info!(
        path = %path.display(),
        format = ?loaded.format,
        branches = loaded.tree.branch_count(),
        nodes = loaded.tree.node_count(),
        "Loaded taxonomy"
    );
    Ok(loaded)
}

/// Writes the tagged snapshot (pretty-printed).
///
/// Trees deeper than [`MAX_SNAPSHOT_DEPTH`] are rejected with [`StorageError::TooDeep`], since
/// [`load_taxonomy`] could not read them back.
pub async fn save_taxonomy(path: impl AsRef<Path>, tree: &TaxonomyTree) -> StorageResult<()> {
    let path = path.as_ref();
    let depth = tree.walk().map(|entry| entry.depth).max().unwrap_or(0);
    if depth > MAX_SNAPSHOT_DEPTH {
        return Err(StorageError::TooDeep {
            path: path.to_path_buf(),
            depth,
            max: MAX_SNAPSHOT_DEPTH,
        });
    }
    let bytes = serde_json::to_vec_pretty(tree).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, &bytes).await?;

    info!(path = %path.display(), nodes = tree.node_count(), "Saved taxonomy snapshot");
    Ok(())
}

/// Reads a JSON array of skills.
pub async fn load_skills(path: impl AsRef<Path>) -> StorageResult<Vec<Skill>> {
    let path = path.as_ref();
    let skills: Vec<Skill> = read_json(path).await?;
    info!(path = %path.display(), skills = skills.len(), "Loaded skills");
    Ok(skills)
}

/// Writes one JSON object per record per line. An empty slice produces an empty file.
pub async fn write_records(path: impl AsRef<Path>, records: &[MatchRecord]) -> StorageResult<()> {
    let path = path.as_ref();
    let mut buf = Vec::with_capacity(records.len() * 160);
    for record in records {
        serde_json::to_writer(&mut buf, record).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        buf.push(b'\n');
    }
    write_bytes(path, &buf).await?;

    info!(path = %path.display(), records = records.len(), "Wrote match records");
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> StorageResult<T> {
    let bytes = tokio::fs::read(path).await.map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read file");

    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_err)
}
