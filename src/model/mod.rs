pub mod blueprint;
pub mod graph;
pub mod node;
pub mod pin;

// Re-export commonly used types at the model level.
pub use blueprint::{Blueprint, ComponentDecl, MemberVariable, EVENT_GRAPH_NAME};
pub use graph::{Graph, Link, LinkError, LinkOutcome, PinRef};
pub use node::{Node, NodeId, NodeKind, Position};
pub use pin::{Pin, PinDirection, PinType, SELF_PIN};
