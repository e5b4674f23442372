use serde::{Deserialize, Serialize};

use super::graph::Graph;
use super::pin::PinType;

pub const EVENT_GRAPH_NAME: &str = "EventGraph";

/// A component declared in the blueprint's construction script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name: String,
    /// Canonical class name, e.g. `StaticMeshComponent`.
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberVariable {
    pub name: String,
    pub pin_type: PinType,
    /// Visible and editable in the details panel.
    #[serde(default)]
    pub exposed: bool,
}

/// A named container owning one event graph and its member declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    pub parent_class: String,
    /// Class generated for this blueprint; absent until first compiled.
    #[serde(default)]
    pub generated_class: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
    #[serde(default)]
    pub variables: Vec<MemberVariable>,
    #[serde(default)]
    event_graph: Option<Graph>,
    #[serde(skip)]
    modified: bool,
}

impl Blueprint {
    pub fn new(name: impl Into<String>, parent_class: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            generated_class: Some(format!("{name}_C")),
            name,
            parent_class: parent_class.into(),
            components: Vec::new(),
            variables: Vec::new(),
            event_graph: None,
            modified: false,
        }
    }

    pub fn with_component(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.components.push(ComponentDecl {
            name: name.into(),
            class: class.into(),
        });
        self
    }

    /// Class whose events and functions "self" exposes: the generated class
    /// when present, otherwise the parent.
    pub fn behavior_class(&self) -> &str {
        self.generated_class.as_deref().unwrap_or(&self.parent_class)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDecl> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&MemberVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn event_graph(&self) -> Option<&Graph> {
        self.event_graph.as_ref()
    }

    /// Return the event graph, creating an empty one on first access.
    pub fn find_or_create_event_graph(&mut self) -> &mut Graph {
        self.event_graph
            .get_or_insert_with(|| Graph::new(EVENT_GRAPH_NAME))
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::node::{Node, NodeKind, Position};

    #[test]
    fn test_event_graph_find_or_create_is_idempotent() {
        let mut bp = Blueprint::new("PlayerChar", "Character");
        assert!(bp.event_graph().is_none());

        let first = bp.find_or_create_event_graph();
        first.add_node(Node::new(NodeKind::SelfReference, Position::default(), vec![]));
        let first_ptr: *const Graph = first;

        let second = bp.find_or_create_event_graph();
        assert_eq!(second.nodes().len(), 1);
        assert!(std::ptr::eq(first_ptr, second));
        assert_eq!(bp.event_graph().unwrap().name, EVENT_GRAPH_NAME);
    }

    #[test]
    fn test_behavior_class_falls_back_to_parent() {
        let mut bp = Blueprint::new("Door", "Actor");
        assert_eq!(bp.behavior_class(), "Door_C");
        bp.generated_class = None;
        assert_eq!(bp.behavior_class(), "Actor");
    }
}
