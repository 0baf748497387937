//! Import of the legacy nested-mapping taxonomy format.
//!
//! In that format a node is a JSON object whose `_description`, `_id` and `_embedding` keys hold
//! metadata and whose every other key is a child node:
//!
//! ```json
//! { "1": { "_description": "Safety", "_id": "1", "_embedding": [1.0, 0.0],
//!          "1": { "_description": "Hazard awareness" } } }
//! ```
//!
//! The reserved prefix exists only at this boundary; the converted [`TaxonomyTree`] has no
//! reserved keys.

use serde_json::{Map, Value};
use tracing::warn;

use crate::constants::{
    LEGACY_DESCRIPTION_KEY, LEGACY_EMBEDDING_KEY, LEGACY_ID_KEY, LEGACY_METADATA_PREFIX,
    TAGGED_NODE_FIELDS, TAGGED_ROOT_KEY,
};

use super::error::{StructuralTaxonomyError, TaxonomyError, TaxonomyResult};
use super::id::child_id;
use super::node::TaxonomyNode;
use super::tree::TaxonomyTree;

impl TaxonomyTree {
    /// Converts a legacy document into a tree, returning any structural problems found.
    ///
    /// Malformed embeddings (nested lists, non-numeric values) are dropped and reported; the
    /// node itself is kept. Non-object children are skipped and reported.
    pub fn from_legacy_json(
        value: &Value,
    ) -> TaxonomyResult<(TaxonomyTree, Vec<StructuralTaxonomyError>)> {
        let Value::Object(map) = value else {
            return Err(TaxonomyError::MissingRoot);
        };

        let mut issues = Vec::new();
        let root = convert_node("", map, "", &mut issues);

        for issue in &issues {
            warn!(issue = %issue, "Legacy taxonomy import problem");
        }

        Ok((TaxonomyTree::new(root), issues))
    }

    /// Parses a legacy document from a JSON string.
    pub fn from_legacy_str(json: &str) -> TaxonomyResult<(TaxonomyTree, Vec<StructuralTaxonomyError>)> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_legacy_json(&value)
    }
}

/// Returns `true` if a JSON document is in the legacy format rather than a tagged snapshot.
///
/// A tagged snapshot has exactly one top-level key, `root`, and that root carries only tagged
/// node fields. Any other object is legacy, including one whose branch happens to be keyed
/// `root`. A lone non-object `root` is treated as a broken snapshot.
pub fn is_legacy_document(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if map.len() != 1 {
        return true;
    }
    match map.get(TAGGED_ROOT_KEY) {
        Some(Value::Object(root)) => !root
            .keys()
            .all(|field| TAGGED_NODE_FIELDS.contains(&field.as_str())),
        Some(_) => false,
        None => true,
    }
}

// serde_json caps nesting at 128 levels, so the recursion here is bounded by the parser.
fn convert_node(
    key: &str,
    map: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<StructuralTaxonomyError>,
) -> TaxonomyNode {
    let description = map
        .get(LEGACY_DESCRIPTION_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut node = TaxonomyNode::new(key, description);

    node.id = match map.get(LEGACY_ID_KEY) {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    if let Some(raw) = map.get(LEGACY_EMBEDDING_KEY) {
        match parse_embedding(raw) {
            Ok(embedding) => node.embedding = Some(embedding),
            Err(reason) => issues.push(StructuralTaxonomyError::MalformedEmbedding {
                path: path.to_string(),
                reason,
            }),
        }
    }

    for (child_key, child_value) in map {
        if child_key.starts_with(LEGACY_METADATA_PREFIX) {
            continue;
        }
        let child_path = child_id(path, child_key);
        match child_value {
            Value::Object(child_map) => {
                node.children
                    .push(convert_node(child_key, child_map, &child_path, issues));
            }
            _ => issues.push(StructuralTaxonomyError::InvalidChild {
                key: child_key.clone(),
                parent: path.to_string(),
            }),
        }
    }

    node
}

fn parse_embedding(raw: &Value) -> Result<Vec<f32>, String> {
    let Value::Array(items) = raw else {
        return Err("embedding is not a list".to_string());
    };
    if items.is_empty() {
        return Err("embedding is empty".to_string());
    }
    items
        .iter()
        .map(|item| match item {
            Value::Number(n) => n
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| "embedding value out of range".to_string()),
            Value::Array(_) => Err("nested list instead of a single vector".to_string()),
            other => Err(format!("non-numeric embedding value: {other}")),
        })
        .collect()
}
