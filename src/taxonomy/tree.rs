use serde::{Deserialize, Serialize};

use super::id::{IdScope, is_well_formed};
use super::node::TaxonomyNode;

/// A taxonomy rooted at a synthetic node whose children are the top-level branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyTree {
    pub root: TaxonomyNode,
}

/// A node reached during traversal, with its resolved id and depth (top level is 0).
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    pub node: &'a TaxonomyNode,
    pub id: String,
    pub depth: usize,
}

impl TaxonomyTree {
    pub fn new(root: TaxonomyNode) -> Self {
        Self { root }
    }

    /// Builds a tree whose synthetic root holds `branches` in the given order.
    pub fn from_branches(branches: impl IntoIterator<Item = TaxonomyNode>) -> Self {
        Self {
            root: TaxonomyNode {
                children: branches.into_iter().collect(),
                ..Default::default()
            },
        }
    }

    pub fn root(&self) -> &TaxonomyNode {
        &self.root
    }

    /// Top-level branches in authored order.
    pub fn branches(&self) -> &[TaxonomyNode] {
        &self.root.children
    }

    pub fn branch_count(&self) -> usize {
        self.root.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Id prefix that top-level branches extend. A malformed root id is ignored.
    pub fn root_prefix(&self) -> &str {
        self.root.id.as_deref().filter(|id| is_well_formed(id)).unwrap_or("")
    }

    /// Top-level branches in authored order, with their resolved ids.
    pub fn branch_ids(&self) -> Vec<(&TaxonomyNode, String)> {
        IdScope::new().resolve_children(&self.root.children, self.root_prefix())
    }

    /// Pre-order traversal of every node below the root.
    pub fn walk(&self) -> Walk<'_> {
        let mut stack: Vec<(&TaxonomyNode, String, usize)> = self
            .branch_ids()
            .into_iter()
            .map(|(branch, id)| (branch, id, 0))
            .collect();
        stack.reverse();
        Walk {
            stack,
            scope: IdScope::new(),
        }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Finds a node by its resolved id.
    pub fn find(&self, id: &str) -> Option<&TaxonomyNode> {
        self.walk().find(|r| r.id == id).map(|r| r.node)
    }

    /// Returns the chain of nodes from a top-level branch down to the node with `id`.
    pub fn path_to(&self, id: &str) -> Option<Vec<&TaxonomyNode>> {
        let mut path: Vec<&TaxonomyNode> = Vec::new();
        for entry in self.walk() {
            path.truncate(entry.depth);
            path.push(entry.node);
            if entry.id == id {
                return Some(path);
            }
        }
        None
    }

    /// Descriptions along [`path_to`](Self::path_to), top-level first.
    pub fn path_descriptions(&self, id: &str) -> Option<Vec<String>> {
        self.path_to(id)
            .map(|path| path.into_iter().map(|n| n.description.clone()).collect())
    }
}

/// Iterator returned by [`TaxonomyTree::walk`].
pub struct Walk<'a> {
    stack: Vec<(&'a TaxonomyNode, String, usize)>,
    /// Ids taken within the branch being walked.
    scope: IdScope,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, id, depth) = self.stack.pop()?;
        if depth == 0 {
            self.scope = IdScope::seeded(&id);
        }

        let children = self.scope.resolve_children(&node.children, &id);
        for (child, child_id) in children.into_iter().rev() {
            self.stack.push((child, child_id, depth + 1));
        }

        Some(NodeRef { node, id, depth })
    }
}
