//! Generated knowledge graph (a named tree of topics)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Nested children beyond this depth are dropped when parsing
pub const MAX_GRAPH_DEPTH: usize = 8;

/// One node of a knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<KnowledgeNode>,
}

impl KnowledgeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: KnowledgeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(KnowledgeNode::node_count).sum::<usize>()
    }

    /// Levels in this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(KnowledgeNode::depth).max().unwrap_or(0)
    }

    pub fn leaves(&self) -> Vec<&str> {
        if self.is_leaf() {
            return vec![self.name.as_str()];
        }
        self.children.iter().flat_map(KnowledgeNode::leaves).collect()
    }
}

/// A knowledge graph rooted at its topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeGraph {
    pub root: KnowledgeNode,
}

impl KnowledgeGraph {
    /// Parse an extracted graph value.
    ///
    /// The root name falls back to `topic`. Children may be objects with a
    /// `name` or plain strings; anything else is skipped.
    pub fn from_value(value: &Value, topic: &str) -> Option<Self> {
        let name = node_name(value).unwrap_or_else(|| topic.to_string());
        let children = parse_children(value, 1);
        if children.is_empty() {
            return None;
        }
        Some(Self {
            root: KnowledgeNode { name, children },
        })
    }

    pub fn topic(&self) -> &str {
        &self.root.name
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

fn node_name(value: &Value) -> Option<String> {
    value
        .get("name")
        .or_else(|| value.get("title"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_children(value: &Value, depth: usize) -> Vec<KnowledgeNode> {
    if depth >= MAX_GRAPH_DEPTH {
        return Vec::new();
    }
    let Some(children) = value.get("children").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    children
        .iter()
        .filter_map(|child| match child {
            Value::String(s) if !s.trim().is_empty() => Some(KnowledgeNode::leaf(s.trim())),
            Value::Object(_) => node_name(child).map(|name| KnowledgeNode {
                name,
                children: parse_children(child, depth + 1),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let value = json!({
            "name": "Ownership",
            "children": [
                {"name": "Moves", "children": [{"name": "Copy types"}, "Clone"]},
                {"name": "Borrowing"},
                {"children": []},
                7
            ]
        });
        let graph = KnowledgeGraph::from_value(&value, "fallback").unwrap();
        assert_eq!(graph.topic(), "Ownership");
        assert_eq!(graph.root.children.len(), 2);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.depth(), 3);
        assert_eq!(graph.root.leaves(), vec!["Copy types", "Clone", "Borrowing"]);
    }

    #[test]
    fn test_root_name_falls_back_to_topic() {
        let value = json!({"children": ["Traits"]});
        let graph = KnowledgeGraph::from_value(&value, "Generics").unwrap();
        assert_eq!(graph.topic(), "Generics");
    }

    #[test]
    fn test_empty_graph_is_rejected() {
        assert!(KnowledgeGraph::from_value(&json!({"name": "x", "children": []}), "x").is_none());
        assert!(KnowledgeGraph::from_value(&json!("x"), "x").is_none());
    }

    #[test]
    fn test_serializes_as_plain_tree() {
        let graph = KnowledgeGraph {
            root: KnowledgeNode::leaf("Root").with_child(KnowledgeNode::leaf("Leaf")),
        };
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value, json!({"name": "Root", "children": [{"name": "Leaf"}]}));
    }
}
