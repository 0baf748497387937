use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{StructuralTaxonomyError, TaxonomyError, TaxonomyResult};
use super::id::{IdScope, child_id, id_segments, is_strict_extension, is_well_formed, resolve_id};
use super::node::TaxonomyNode;
use super::tree::TaxonomyTree;

/// A flat `(taxonomy id, description)` row, as exported from a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRow {
    #[serde(alias = "Taxonomy ID")]
    pub taxonomy_id: String,
    #[serde(alias = "Description")]
    pub description: String,
}

impl TaxonomyRow {
    pub fn new(taxonomy_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            taxonomy_id: taxonomy_id.into(),
            description: description.into(),
        }
    }
}

impl TaxonomyTree {
    /// Builds a hierarchy from flat rows, creating intermediate nodes as needed.
    ///
    /// Every created node gets the id of its dotted path. A row naming an existing node
    /// replaces its description.
    pub fn from_rows<I>(rows: I) -> TaxonomyResult<Self>
    where
        I: IntoIterator<Item = TaxonomyRow>,
    {
        let mut tree = TaxonomyTree::default();

        for (line, row) in rows.into_iter().enumerate() {
            let segments: Vec<&str> = id_segments(&row.taxonomy_id).collect();
            if segments.is_empty() {
                return Err(TaxonomyError::InvalidRow {
                    line: line + 1,
                    reason: format!("empty taxonomy id '{}'", row.taxonomy_id),
                });
            }

            let mut current = &mut tree.root;
            let mut path = String::new();
            for segment in segments {
                path = child_id(&path, segment);
                let position = match current.children.iter().position(|c| c.key == segment) {
                    Some(position) => position,
                    None => {
                        current
                            .children
                            .push(TaxonomyNode::new(segment, "").with_id(path.clone()));
                        current.children.len() - 1
                    }
                };
                current = &mut current.children[position];
            }

            if !current.description.is_empty() && current.description != row.description {
                warn!(
                    id = %path,
                    previous = %current.description,
                    replacement = %row.description,
                    "Taxonomy row redefines an existing node"
                );
            }
            current.description = row.description;
        }

        debug!(
            branches = tree.branch_count(),
            nodes = tree.node_count(),
            "Built taxonomy from rows"
        );

        Ok(tree)
    }

    /// Stores the resolved id on every node that lacks one; returns how many were assigned.
    ///
    /// Existing ids are never overwritten, so repeated calls are no-ops. Nodes are visited in
    /// the same order as [`walk`](Self::walk), so the stored ids match what searches report.
    pub fn assign_ids(&mut self) -> usize {
        let branch_ids: Vec<String> = self.branch_ids().into_iter().map(|(_, id)| id).collect();
        let mut assigned = 0;

        for (branch, branch_id) in self.root.children.iter_mut().zip(branch_ids) {
            let mut scope = IdScope::seeded(&branch_id);
            let mut stack: Vec<(&mut TaxonomyNode, String)> = vec![(branch, branch_id)];

            while let Some((node, id)) = stack.pop() {
                let child_ids: Vec<String> = node
                    .children
                    .iter()
                    .map(|child| scope.resolve(child.id.as_deref(), &id, &child.key))
                    .collect();
                if node.id.is_none() {
                    node.id = Some(id);
                    assigned += 1;
                }
                for pair in node.children.iter_mut().zip(child_ids).rev() {
                    stack.push(pair);
                }
            }
        }

        if assigned > 0 {
            debug!(assigned, "Assigned synthesized taxonomy ids");
        }
        assigned
    }

    /// Reports structural problems (duplicate or malformed ids, duplicate keys, inconsistent
    /// embedding dimensions). Each problem is also logged as a warning.
    pub fn validate(&self) -> Vec<StructuralTaxonomyError> {
        let mut issues = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut dimension: Option<usize> = None;

        let root_id = self.root_prefix().to_string();
        let mut stack: Vec<(&TaxonomyNode, String, Option<String>)> =
            vec![(&self.root, root_id, None)];

        while let Some((node, resolved, parent)) = stack.pop() {
            if let Some(parent) = parent.as_deref() {
                check_node(node, &resolved, parent, &mut seen_ids, &mut dimension, &mut issues);
            }

            let mut keys: HashSet<&str> = HashSet::new();
            for child in &node.children {
                if !keys.insert(child.key.as_str()) {
                    issues.push(StructuralTaxonomyError::DuplicateKey {
                        key: child.key.clone(),
                        parent: resolved.clone(),
                    });
                }
            }

            for child in node.children.iter().rev() {
                let id = resolve_id(child.id.as_deref(), &resolved, &child.key);
                stack.push((child, id, Some(resolved.clone())));
            }
        }

        for issue in &issues {
            warn!(issue = %issue, "Structural taxonomy problem");
        }
        issues
    }
}

fn check_node(
    node: &TaxonomyNode,
    resolved: &str,
    parent: &str,
    seen_ids: &mut HashSet<String>,
    dimension: &mut Option<usize>,
    issues: &mut Vec<StructuralTaxonomyError>,
) {
    if let Some(id) = node.id.as_deref() {
        if !is_well_formed(id) {
            issues.push(StructuralTaxonomyError::MalformedId {
                id: id.to_string(),
                reason: "empty id segment".to_string(),
            });
        } else if !is_strict_extension(parent, id) {
            issues.push(StructuralTaxonomyError::NotPrefixed {
                id: id.to_string(),
                parent: parent.to_string(),
            });
        }
    }

    if !seen_ids.insert(resolved.to_string()) {
        issues.push(StructuralTaxonomyError::DuplicateId {
            id: resolved.to_string(),
        });
    }

    if let Some(embedding) = node.embedding.as_deref() {
        match *dimension {
            None if !embedding.is_empty() => *dimension = Some(embedding.len()),
            Some(expected) if embedding.len() != expected => {
                issues.push(StructuralTaxonomyError::DimensionMismatch {
                    id: resolved.to_string(),
                    expected,
                    actual: embedding.len(),
                });
            }
            _ => {}
        }
    }
}
