use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId};
use super::pin::{PinDirection, PinType};
use crate::reflect::TypeRegistry;

/// One end of a link: a pin addressed by owning node and pin name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    pub node: NodeId,
    pub pin: String,
}

impl PinRef {
    pub fn new(node: NodeId, pin: impl Into<String>) -> Self {
        Self {
            node,
            pin: pin.into(),
        }
    }
}

/// Directed link from an output pin to an input pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: PinRef,
    pub to: PinRef,
}

/// Why the connection primitive refused a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    NodeMissing(NodeId),
    PinMissing { node: NodeId, pin: String, direction: PinDirection },
    SameNode,
    Incompatible { from: PinType, to: PinType },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NodeMissing(id) => write!(f, "node '{id}' not found"),
            LinkError::PinMissing {
                node,
                pin,
                direction,
            } => write!(f, "{direction:?} pin '{pin}' not found on node '{node}'"),
            LinkError::SameNode => write!(f, "cannot link a node to itself"),
            LinkError::Incompatible { from, to } => {
                write!(f, "cannot link {from} output to {to} input")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
    /// The data input already had a source; that link was broken first.
    Replaced,
}

/// Opaque marker for [`Graph::rollback`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    nodes: usize,
    links: usize,
}

/// Ordered node collection plus the links between their pins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    links: Vec<Link>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Append a node and return its identifier.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        // v4 collisions are not expected; regenerate rather than alias two nodes.
        while self.node(node.id).is_some() {
            node.id = NodeId::new();
        }
        let id = node.id;
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn is_input_linked(&self, node: NodeId, pin: &str) -> bool {
        self.links.iter().any(|l| l.to.node == node && l.to.pin == pin)
    }

    /// The connection primitive. `from` must name an output pin and `to` an
    /// input pin on a different node, and the pin types must be compatible.
    pub fn make_link(
        &mut self,
        from: PinRef,
        to: PinRef,
        types: &dyn TypeRegistry,
    ) -> Result<LinkOutcome, LinkError> {
        if from.node == to.node {
            return Err(LinkError::SameNode);
        }
        let from_type = self.pin_type(&from, PinDirection::Output)?;
        let to_type = self.pin_type(&to, PinDirection::Input)?;
        if !from_type.can_connect_to(&to_type, types) {
            return Err(LinkError::Incompatible {
                from: from_type,
                to: to_type,
            });
        }

        let link = Link { from, to };
        if self.links.contains(&link) {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let mut outcome = LinkOutcome::Linked;
        if !to_type.is_exec() {
            let before = self.links.len();
            self.links
                .retain(|l| !(l.to.node == link.to.node && l.to.pin == link.to.pin));
            if self.links.len() != before {
                outcome = LinkOutcome::Replaced;
            }
        }
        self.links.push(link);
        Ok(outcome)
    }

    fn pin_type(&self, at: &PinRef, direction: PinDirection) -> Result<PinType, LinkError> {
        let node = self.node(at.node).ok_or(LinkError::NodeMissing(at.node))?;
        node.find_pin(&at.pin, direction)
            .map(|p| p.pin_type.clone())
            .ok_or_else(|| LinkError::PinMissing {
                node: at.node,
                pin: at.pin.clone(),
                direction,
            })
    }

    /// Record the current size so a failed multi-node edit can be undone.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            nodes: self.nodes.len(),
            links: self.links.len(),
        }
    }

    /// Drop every node and link appended since `checkpoint`.
    ///
    /// Only valid while edits since the checkpoint were appends; replaced
    /// links are not restored.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.nodes.truncate(checkpoint.nodes);
        self.links.truncate(checkpoint.links);
    }
}
