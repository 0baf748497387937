use tracing::debug;

use crate::scoring::score_embedding;
use crate::taxonomy::{IdScope, TaxonomyNode, TaxonomyTree, is_well_formed};

use super::types::{ScoredNode, SearchMode};

/// Scores `node` and all of its descendants against `query`.
///
/// `node_id` is used for `node` when it has no well-formed stored id. Descendants are addressed
/// by their stored id if it extends their parent's id and is not already taken in the subtree,
/// otherwise by `parent_id.key`. Nodes without an embedding score 0 and their children are
/// still visited.
///
/// Traversal uses an explicit stack, so depth is limited only by memory.
pub fn search_subtree<'a>(
    query: &[f32],
    node: &'a TaxonomyNode,
    node_id: &str,
    mode: SearchMode,
) -> Vec<ScoredNode<'a>> {
    let id = node
        .id
        .as_deref()
        .filter(|id| is_well_formed(id))
        .unwrap_or(node_id);
    scan_subtree(query, node, id, mode).0
}

/// Scores every node of the tree without pruning.
pub fn search_tree<'a>(query: &[f32], tree: &'a TaxonomyTree, mode: SearchMode) -> Vec<ScoredNode<'a>> {
    let mut results = Vec::new();
    for (branch, id) in tree.branch_ids() {
        results.extend(scan_subtree(query, branch, &id, mode).0);
    }
    match mode {
        SearchMode::AllMatches => results,
        SearchMode::SingleBest => first_best(results).into_iter().collect(),
    }
}

/// Returns the results and the number of nodes scored. `node_id` is `node`'s resolved id.
pub(crate) fn scan_subtree<'a>(
    query: &[f32],
    node: &'a TaxonomyNode,
    node_id: &str,
    mode: SearchMode,
) -> (Vec<ScoredNode<'a>>, usize) {
    let mut scope = IdScope::seeded(node_id);
    let mut stack: Vec<(&'a TaxonomyNode, String, usize)> = vec![(node, node_id.to_string(), 0)];
    let mut best: Option<ScoredNode<'a>> = None;
    let mut all = Vec::new();
    let mut visited = 0usize;

    while let Some((current, id, depth)) = stack.pop() {
        visited += 1;
        let score = score_embedding(query, current.embedding(), current.label());
        debug!(
            depth,
            id = %id,
            node = current.label(),
            similarity = score,
            "Compared with taxonomy node"
        );

        let children = scope.resolve_children(&current.children, &id);
        for (child, next_id) in children.into_iter().rev() {
            stack.push((child, next_id, depth + 1));
        }

        let scored = ScoredNode {
            node: current,
            score,
            id,
            depth,
        };
        match mode {
            SearchMode::SingleBest => {
                if best.as_ref().is_none_or(|b| scored.score > b.score) {
                    best = Some(scored);
                }
            }
            SearchMode::AllMatches => all.push(scored),
        }
    }

    match mode {
        SearchMode::SingleBest => (best.into_iter().collect(), visited),
        SearchMode::AllMatches => (all, visited),
    }
}

/// Highest-scoring entry; the earliest one wins ties.
pub(crate) fn first_best<'a>(results: Vec<ScoredNode<'a>>) -> Option<ScoredNode<'a>> {
    results.into_iter().fold(None, |best, candidate| match best {
        Some(b) if candidate.score <= b.score => Some(b),
        _ => Some(candidate),
    })
}
