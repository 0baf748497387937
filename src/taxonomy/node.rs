use serde::{Deserialize, Serialize};

/// One node of the taxonomy.
///
/// Metadata lives in named fields and children in an ordered list, so a label can never be
/// mistaken for a metadata key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyNode {
    /// Local key under the parent (usually the last id segment).
    #[serde(default)]
    pub key: String,
    /// Human-readable label; empty for synthetic roots.
    #[serde(default)]
    pub description: String,
    /// Stable dotted-path id, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Precomputed embedding of the node's description in ancestor context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Children in authored order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNode>,
}

impl TaxonomyNode {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_child(mut self, child: TaxonomyNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, key: &str) -> Option<&TaxonomyNode> {
        self.children.iter().find(|c| c.key == key)
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// `true` if the node holds a non-empty, all-finite embedding.
    pub fn has_valid_embedding(&self) -> bool {
        self.embedding
            .as_deref()
            .is_some_and(|e| !e.is_empty() && e.iter().all(|v| v.is_finite()))
    }

    /// Best available name for logging: description, then id, then key.
    pub fn label(&self) -> &str {
        if !self.description.is_empty() {
            &self.description
        } else if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            id
        } else {
            &self.key
        }
    }
}
