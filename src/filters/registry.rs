//! Catalogue of the node types this crate ships.

use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::notify::{LogSink, NotificationSink};
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating node instances.
pub type NodeFactory = Arc<dyn Fn() -> Box<dyn FilterNode> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: NodeFactory,
    /// Cached metadata (avoids creating an instance just to read it).
    pub metadata: NodeMetadata,
}

/// Node types indexed by id, in registration order.
pub struct NodeRegistry {
    nodes: IndexMap<String, RegistryEntry>,
    categories: IndexMap<Category, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Registry with every built-in node; status messages go to the log.
    pub fn with_builtins() -> Self {
        Self::with_builtins_and_sink(Arc::new(LogSink))
    }

    /// Registry with every built-in node, reporting status to `sink`.
    pub fn with_builtins_and_sink(sink: Arc<dyn NotificationSink>) -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry, sink);
        registry
    }

    /// Register a node type. A later registration with the same id wins.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn FilterNode> + Send + Sync + 'static,
    {
        let metadata = factory().metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };
        if self.nodes.insert(id.clone(), entry).is_none() {
            self.categories.entry(category).or_default().push(id);
        }
    }

    /// Create a new instance of a node by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn FilterNode>> {
        self.nodes.get(id).map(|e| (e.factory)())
    }

    /// Get metadata for a node without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&NodeMetadata> {
        self.nodes.get(id).map(|e| &e.metadata)
    }

    /// Check if a node is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All registered ids, in registration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// All registered entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Ids registered under a category.
    pub fn nodes_by_category(&self, category: Category) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Search by id, name, description or tag (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.nodes
            .iter()
            .filter(|(_, entry)| {
                let m = &entry.metadata;
                m.id.to_lowercase().contains(&query)
                    || m.name.to_lowercase().contains(&query)
                    || m.description.to_lowercase().contains(&query)
                    || m.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Number of registered node types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = NodeRegistry::with_builtins();
        let ids: Vec<&str> = registry.node_ids().collect();
        assert_eq!(
            ids,
            vec![
                "seamless_texture",
                "any_switch",
                "aspect_ratio",
                "multi_float",
                "multi_text",
                "display_any",
            ]
        );
        assert!(registry.contains("seamless_texture"));
        assert_eq!(registry.create("multi_float").unwrap().metadata().id, "multi_float");
        assert!(registry.create("gaussian_blur").is_none());
    }

    #[test]
    fn test_categories_and_search() {
        let registry = NodeRegistry::with_builtins();
        assert_eq!(registry.nodes_by_category(Category::Texture), vec!["seamless_texture"]);
        assert!(registry.search("SEAMLESS").contains(&"seamless_texture"));
        assert!(registry.search("prompt").contains(&"multi_text"));
        assert!(registry.search("no such thing").is_empty());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = NodeRegistry::new();
        assert!(registry.is_empty());
        registry.register(|| Box::new(crate::filters::builtin::MultiFloat));
        registry.register(|| Box::new(crate::filters::builtin::MultiFloat));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.nodes_by_category(Category::Math).len(), 1);
    }
}
