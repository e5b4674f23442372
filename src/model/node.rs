use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pin::{Pin, PinDirection};

/// Process-unique node identifier. Generated once at creation from a random
/// v4 UUID, so allocation needs no coordination across blueprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a caller. Returns `None` for anything
    /// that is not a UUID, which callers report as "node not found".
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Kind-specific binding of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    Event {
        event_name: String,
        owner_class: String,
    },
    FunctionCall {
        function_name: String,
        owner_class: String,
        is_static: bool,
        is_pure: bool,
    },
    VariableGet {
        variable_name: String,
    },
    InputAction {
        action_name: String,
    },
    SelfReference,
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Event { .. } => "Event",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::VariableGet { .. } => "VariableGet",
            NodeKind::InputAction { .. } => "InputAction",
            NodeKind::SelfReference => "Self",
        }
    }

    /// Short title, as an editor would show it on the node header.
    pub fn title(&self) -> String {
        match self {
            NodeKind::Event { event_name, .. } => format!("Event {event_name}"),
            NodeKind::FunctionCall {
                function_name,
                owner_class,
                ..
            } => format!("{owner_class}::{function_name}"),
            NodeKind::VariableGet { variable_name } => format!("Get {variable_name}"),
            NodeKind::InputAction { action_name } => format!("InputAction {action_name}"),
            NodeKind::SelfReference => "Self".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub pins: Vec<Pin>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Position, pins: Vec<Pin>) -> Self {
        Self {
            id: NodeId::new(),
            position,
            kind,
            pins,
        }
    }

    pub fn find_pin(&self, name: &str, direction: PinDirection) -> Option<&Pin> {
        self.pins
            .iter()
            .find(|p| p.direction == direction && p.name == name)
    }

    pub fn find_pin_mut(&mut self, name: &str, direction: PinDirection) -> Option<&mut Pin> {
        self.pins
            .iter_mut()
            .find(|p| p.direction == direction && p.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::pin::PinType;

    #[test]
    fn test_node_ids_parse_round_trip() {
        let id = NodeId::new();
        assert_eq!(NodeId::parse(&id.to_string()), Some(id));
        assert_eq!(NodeId::parse("not-a-guid"), None);
    }

    #[test]
    fn test_find_pin_respects_direction() {
        let node = Node::new(
            NodeKind::SelfReference,
            Position::default(),
            vec![Pin::output("self", PinType::Object("Actor".into()))],
        );
        assert!(node.find_pin("self", PinDirection::Output).is_some());
        assert!(node.find_pin("self", PinDirection::Input).is_none());
    }
}
