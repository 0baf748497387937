use std::cmp::Ordering;

use tracing::debug;

use crate::taxonomy::TaxonomyTree;

use super::searcher::scan_subtree;
use super::types::{BranchScore, PrunedSearch, SearchMode};

/// Searches only the `top_n` most promising top-level branches.
///
/// Each branch is first ranked by the best score anywhere beneath it. The ranking is a stable
/// descending sort, so equal scores keep authored order. The first `top_n` branches (all of
/// them, if there are fewer) are then searched in full with `mode`, and their results are
/// concatenated in ranked order. `top_n == 0` selects nothing.
///
/// An empty tree yields an empty result; that is a valid "no match" outcome.
pub fn prune_and_search<'a>(
    query: &[f32],
    tree: &'a TaxonomyTree,
    top_n: usize,
    mode: SearchMode,
) -> PrunedSearch<'a> {
    if tree.is_empty() {
        debug!("Taxonomy has no top-level branches; nothing to search");
        return PrunedSearch::default();
    }

    let mut branches: Vec<BranchScore<'a>> = tree
        .branch_ids()
        .into_iter()
        .enumerate()
        .filter_map(|(position, (branch, id))| {
            let (best, _) = scan_subtree(query, branch, &id, SearchMode::SingleBest);
            best.into_iter().next().map(|best| BranchScore {
                branch,
                id,
                best_score: best.score,
                position,
            })
        })
        .collect();

    branches.sort_by(|a, b| {
        b.best_score
            .partial_cmp(&a.best_score)
            .unwrap_or(Ordering::Equal)
    });

    let selected = top_n.min(branches.len());
    let mut results = Vec::new();
    let mut visited = 0usize;

    for candidate in &branches[..selected] {
        let (found, scanned) = scan_subtree(query, candidate.branch, &candidate.id, mode);
        visited += scanned;
        results.extend(found);
    }

    debug!(
        branches = branches.len(),
        selected,
        visited,
        results = results.len(),
        "Pruned taxonomy search complete"
    );

    PrunedSearch {
        branches,
        selected,
        results,
        visited,
    }
}
