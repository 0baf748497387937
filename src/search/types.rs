use crate::taxonomy::TaxonomyNode;

/// How much of a subtree scan to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Keep only the highest-scoring node (first encountered wins ties).
    SingleBest,
    /// Keep every visited node.
    AllMatches,
}

/// A node with its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredNode<'a> {
    pub node: &'a TaxonomyNode,
    pub score: f32,
    /// Stored id, or the id synthesized from the node's position.
    pub id: String,
    /// Depth below the top-level branch (the branch itself is 0).
    pub depth: usize,
}

/// First-pass ranking entry for one top-level branch.
#[derive(Debug, Clone)]
pub struct BranchScore<'a> {
    pub branch: &'a TaxonomyNode,
    pub id: String,
    /// Best score anywhere in the branch, including the branch node.
    pub best_score: f32,
    /// Position of the branch in the tree's authored order.
    pub position: usize,
}

/// Output of [`prune_and_search`](super::prune_and_search).
#[derive(Debug, Clone, Default)]
pub struct PrunedSearch<'a> {
    /// Every top-level branch, ranked by `best_score` descending (ties keep authored order).
    pub branches: Vec<BranchScore<'a>>,
    /// How many leading entries of `branches` were searched in full.
    pub selected: usize,
    /// Results from the full search, grouped by branch in ranked order.
    pub results: Vec<ScoredNode<'a>>,
    /// Nodes scored during the full search.
    pub visited: usize,
}

impl<'a> PrunedSearch<'a> {
    /// The branches that were searched in full.
    pub fn selected_branches(&self) -> &[BranchScore<'a>] {
        &self.branches[..self.selected]
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
