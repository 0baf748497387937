use std::collections::HashSet;

use crate::constants::ID_SEPARATOR;

use super::node::TaxonomyNode;

/// Synthesizes the id of a child from its parent's id and its local key.
///
/// Top-level children (empty parent prefix) are addressed by their key alone.
pub fn child_id(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{ID_SEPARATOR}{key}")
    }
}

/// Returns `true` if `child` is `parent` followed by at least one more dotted segment.
pub fn is_strict_extension(parent: &str, child: &str) -> bool {
    if parent.is_empty() {
        return !child.is_empty();
    }
    child
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix(ID_SEPARATOR))
        .is_some_and(|rest| !rest.is_empty())
}

/// Returns `true` if `id` is non-empty and has no blank segment.
pub fn is_well_formed(id: &str) -> bool {
    !id.is_empty() && id.split(ID_SEPARATOR).all(|segment| !segment.trim().is_empty())
}

/// Splits a dotted id into its trimmed, non-empty segments.
pub fn id_segments(id: &str) -> impl Iterator<Item = &str> {
    id.split(ID_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// The id a node is addressed by: its stored id when that is well formed and extends the
/// parent's id, otherwise the id synthesized from the parent's id and the node's key.
pub fn resolve_id(stored: Option<&str>, parent: &str, key: &str) -> String {
    match stored {
        Some(id) if is_well_formed(id) && is_strict_extension(parent, id) => id.to_string(),
        _ => child_id(parent, key),
    }
}

/// Resolves ids within one traversal so that a stored id already taken by an earlier node
/// falls back to the synthesized id.
///
/// Every traversal resolves a node's children together, in stored order, before descending,
/// so all traversals of the same tree agree on every id.
#[derive(Debug, Default)]
pub struct IdScope {
    seen: HashSet<String>,
}

impl IdScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope in which `id` is already taken (the subtree root's own id).
    pub fn seeded(id: &str) -> Self {
        let mut scope = Self::new();
        scope.seen.insert(id.to_string());
        scope
    }

    pub fn resolve(&mut self, stored: Option<&str>, parent: &str, key: &str) -> String {
        let id = resolve_id(stored, parent, key);
        if self.seen.insert(id.clone()) {
            return id;
        }
        let fallback = child_id(parent, key);
        if self.seen.insert(fallback.clone()) {
            return fallback;
        }
        // Synthesized ids collide only when sibling keys repeat; validate() reports that.
        id
    }

    /// Resolves the ids of `parent_id`'s children in stored order.
    pub fn resolve_children<'n>(
        &mut self,
        children: &'n [TaxonomyNode],
        parent_id: &str,
    ) -> Vec<(&'n TaxonomyNode, String)> {
        children
            .iter()
            .map(|child| {
                let id = self.resolve(child.id.as_deref(), parent_id, &child.key);
                (child, id)
            })
            .collect()
    }
}
