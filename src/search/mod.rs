//! Taxonomy similarity search.
//!
//! Searching a query vector against a [`TaxonomyTree`](crate::taxonomy::TaxonomyTree) runs in
//! three steps:
//!
//! 1. [`search_subtree`] scores every node of a subtree (pre-order, explicit stack).
//! 2. [`prune_and_search`] ranks the top-level branches by the best score found anywhere below
//!    them and searches only the first `top_n` in full.
//! 3. [`MatchPolicy::select`] reduces the scored set to the final matches.
//!
//! Ordering is deterministic: traversal is pre-order in stored child order, branch ranking is a
//! stable sort, and every tie goes to the result encountered first.

/// Search error types.
pub mod error;
/// Result selection policies.
pub mod policy;
/// Top-level branch pruning.
pub mod pruner;
/// Subtree scoring.
pub mod searcher;
/// Search result types.
pub mod types;


pub use error::{SearchError, SearchResult};
pub use policy::MatchPolicy;
pub use pruner::prune_and_search;
pub use searcher::{search_subtree, search_tree};
pub use types::{BranchScore, PrunedSearch, ScoredNode, SearchMode};
