//! One-time embedding precomputation, run before any matching.

use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;

use super::id::IdScope;
use super::node::TaxonomyNode;
use super::tree::TaxonomyTree;

/// Which nodes get (re)embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecomputeMode {
    /// Embed only nodes without a valid embedding. Repeated runs are no-ops.
    #[default]
    IfAbsent,
    /// Re-embed every node (e.g. after switching models).
    Overwrite,
}

/// Counts from a precomputation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrecomputeReport {
    pub computed: usize,
    pub skipped: usize,
    pub failed: usize,
}

struct PendingNode {
    path: Vec<usize>,
    id: String,
    context: String,
}

/// Embeds every node's description in the context of its ancestors' descriptions.
///
/// The text for a node is the space-joined descriptions from its top-level ancestor down to the
/// node itself. Missing ids are assigned first. A provider failure leaves that node without an
/// embedding (it will score 0 during search) and does not stop the run.
pub async fn precompute_embeddings(
    tree: &mut TaxonomyTree,
    provider: &dyn EmbeddingProvider,
    mode: PrecomputeMode,
) -> PrecomputeReport {
    tree.assign_ids();

    let mut report = PrecomputeReport::default();
    let pending = collect_pending(tree, mode, &mut report);

    for item in pending {
        if item.context.is_empty() {
            warn!(id = %item.id, "Node has no description in its context; skipping embedding");
            report.failed += 1;
            continue;
        }

        match provider.embed(&item.context).await {
            Ok(embedding) => {
                if let Some(node) = node_at_mut(tree, &item.path) {
                    node.embedding = Some(embedding);
                    report.computed += 1;
                    debug!(id = %item.id, "Computed node embedding");
                }
            }
            Err(err) => {
                warn!(id = %item.id, error = %err, "Failed to embed taxonomy node");
                report.failed += 1;
            }
        }
    }

    info!(
        provider = provider.name(),
        computed = report.computed,
        skipped = report.skipped,
        failed = report.failed,
        "Taxonomy embedding precomputation finished"
    );

    report
}

fn collect_pending(
    tree: &TaxonomyTree,
    mode: PrecomputeMode,
    report: &mut PrecomputeReport,
) -> Vec<PendingNode> {
    let mut pending = Vec::new();
    let root_context = tree.root.description.trim().to_string();
    let mut scope = IdScope::new();

    let mut stack: Vec<(&TaxonomyNode, Vec<usize>, String, String)> = tree
        .branch_ids()
        .into_iter()
        .enumerate()
        .rev()
        .map(|(i, (branch, id))| (branch, vec![i], id, root_context.clone()))
        .collect();

    while let Some((node, path, id, parent_context)) = stack.pop() {
        if path.len() == 1 {
            scope = IdScope::seeded(&id);
        }
        let context = join_context(&parent_context, &node.description);

        if mode == PrecomputeMode::IfAbsent && node.has_valid_embedding() {
            report.skipped += 1;
        } else {
            pending.push(PendingNode {
                path: path.clone(),
                id: id.clone(),
                context: context.clone(),
            });
        }

        let children = scope.resolve_children(&node.children, &id);
        for (i, (child, child_id)) in children.into_iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child, child_path, child_id, context.clone()));
        }
    }

    pending
}

fn join_context(parent: &str, description: &str) -> String {
    let description = description.trim();
    match (parent.is_empty(), description.is_empty()) {
        (true, _) => description.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent} {description}"),
    }
}

fn node_at_mut<'a>(tree: &'a mut TaxonomyTree, path: &[usize]) -> Option<&'a mut TaxonomyNode> {
    let mut node = &mut tree.root;
    for &index in path {
        node = node.children.get_mut(index)?;
    }
    Some(node)
}
