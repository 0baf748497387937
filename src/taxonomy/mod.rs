//! In-memory taxonomy tree.
//!
//! A [`TaxonomyTree`] is built once (from flat rows, a tagged JSON snapshot, or the legacy
//! nested-mapping format), optionally enriched by [`precompute_embeddings`], and then shared
//! read-only by every search.
//!
//! Ids are dotted paths (`"6.4.2"`). A node is addressed by its stored id when that id is well
//! formed, extends its parent's id and is not already taken; otherwise by the id synthesized
//! from its parent's id and its own local key. See [`resolve_id`] and [`IdScope`].

/// Construction from rows, id assignment, and structural validation.
pub mod builder;
/// Taxonomy error types.
pub mod error;
/// Dotted-path id helpers.
pub mod id;
/// Import of the legacy reserved-prefix format.
pub mod legacy;
/// Node type.
pub mod node;
/// Embedding precomputation stage.
pub mod precompute;
/// Tree type and read-only traversal.
pub mod tree;


pub use builder::TaxonomyRow;
pub use error::{StructuralTaxonomyError, TaxonomyError, TaxonomyResult};
pub use id::{IdScope, child_id, id_segments, is_strict_extension, is_well_formed, resolve_id};
pub use legacy::is_legacy_document;
pub use node::TaxonomyNode;
pub use precompute::{PrecomputeMode, PrecomputeReport, precompute_embeddings};
pub use tree::{NodeRef, TaxonomyTree, Walk};
