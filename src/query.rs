//! Structural node search over an event graph.

use crate::error::AppError;
use crate::model::{Graph, Node, NodeId, NodeKind};

/// Node kind plus the bound name that discriminates nodes of that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFilter {
    Event { event_name: String },
    InputAction { action_name: String },
    FunctionCall { function_name: String },
    VariableGet { variable_name: String },
    SelfReference,
}

impl NodeFilter {
    /// Build a filter from a node type name and a lookup for the request's
    /// discriminator fields. Unknown node types yield `Ok(None)`; a missing
    /// discriminator for a known type is a `missing_parameter` error.
    pub fn from_request<'a>(
        node_type: &str,
        field: impl Fn(&str) -> Option<&'a str>,
    ) -> Result<Option<Self>, AppError> {
        let required = |name: &str| {
            field(name)
                .map(str::to_string)
                .ok_or_else(|| AppError::missing(name))
        };
        let filter = match node_type {
            "Event" => NodeFilter::Event {
                event_name: required("event_name")?,
            },
            "InputAction" => NodeFilter::InputAction {
                action_name: required("action_name")?,
            },
            "FunctionCall" | "Function" => NodeFilter::FunctionCall {
                function_name: required("function_name")?,
            },
            "VariableGet" | "Variable" => NodeFilter::VariableGet {
                variable_name: required("variable_name")?,
            },
            "Self" | "SelfReference" => NodeFilter::SelfReference,
            _ => return Ok(None),
        };
        Ok(Some(filter))
    }

    pub fn matches(&self, node: &Node) -> bool {
        match (self, &node.kind) {
            (NodeFilter::Event { event_name }, NodeKind::Event { event_name: bound, .. }) => {
                bound == event_name
            }
            (
                NodeFilter::InputAction { action_name },
                NodeKind::InputAction { action_name: bound },
            ) => bound == action_name,
            (
                NodeFilter::FunctionCall { function_name },
                NodeKind::FunctionCall {
                    function_name: bound,
                    ..
                },
            ) => bound == function_name,
            (
                NodeFilter::VariableGet { variable_name },
                NodeKind::VariableGet {
                    variable_name: bound,
                },
            ) => bound == variable_name,
            (NodeFilter::SelfReference, NodeKind::SelfReference) => true,
            _ => false,
        }
    }
}

/// Ids of matching nodes in graph order. A blueprint without an event graph
/// has no nodes.
pub fn find_nodes(graph: Option<&Graph>, filter: &NodeFilter) -> Vec<NodeId> {
    graph
        .map(|g| {
            g.nodes()
                .iter()
                .filter(|n| filter.matches(n))
                .map(|n| n.id)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn event(name: &str) -> Node {
        Node::new(
            NodeKind::Event {
                event_name: name.into(),
                owner_class: "Actor".into(),
            },
            Position::default(),
            vec![],
        )
    }

    fn no_fields(_: &str) -> Option<&'static str> {
        None
    }

    #[test]
    fn test_event_filter_requires_event_name() {
        let err = NodeFilter::from_request("Event", no_fields).unwrap_err();
        assert_eq!(err.to_string(), "missing_parameter: event_name");

        let filter = NodeFilter::from_request("Event", |f| (f == "event_name").then_some("BeginPlay"))
            .unwrap()
            .unwrap();
        assert_eq!(
            filter,
            NodeFilter::Event {
                event_name: "BeginPlay".into()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        assert_eq!(NodeFilter::from_request("Macro", no_fields).unwrap(), None);
        assert_eq!(
            NodeFilter::from_request("Self", no_fields).unwrap(),
            Some(NodeFilter::SelfReference)
        );
    }

    #[test]
    fn test_find_nodes_in_graph_order() {
        let mut graph = Graph::new("EventGraph");
        let a = graph.add_node(event("BeginPlay"));
        graph.add_node(event("Tick"));
        let c = graph.add_node(event("BeginPlay"));

        let filter = NodeFilter::Event {
            event_name: "BeginPlay".into(),
        };
        assert_eq!(find_nodes(Some(&graph), &filter), vec![a, c]);

        let none = NodeFilter::Event {
            event_name: "beginplay".into(),
        };
        assert!(find_nodes(Some(&graph), &none).is_empty());
        assert!(find_nodes(None, &filter).is_empty());
    }
}
