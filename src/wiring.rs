use tracing::{info, warn};

use crate::error::AppError;
use crate::model::{Graph, LinkError, LinkOutcome, NodeId, PinDirection, PinRef};
use crate::reflect::TypeRegistry;

/// One side of a connect request, as received from the caller.
#[derive(Debug, Clone, Copy)]
pub struct PinAddress<'a> {
    pub node_id: &'a str,
    pub pin: &'a str,
}

impl<'a> PinAddress<'a> {
    pub fn new(node_id: &'a str, pin: &'a str) -> Self {
        Self { node_id, pin }
    }

    fn resolve(&self, graph: &Graph) -> Result<PinRef, AppError> {
        NodeId::parse(self.node_id)
            .filter(|id| graph.node(*id).is_some())
            .map(|id| PinRef::new(id, self.pin))
            .ok_or_else(|| AppError::not_found(format!("node '{}'", self.node_id)))
    }
}

/// Link `source` (an output pin) to `target` (an input pin).
///
/// Missing nodes or pins are `not_found`; a link the graph refuses is
/// `connection_failed`.
pub fn connect(
    graph: &mut Graph,
    types: &dyn TypeRegistry,
    source: PinAddress<'_>,
    target: PinAddress<'_>,
) -> Result<LinkOutcome, AppError> {
    let from = source.resolve(graph)?;
    let to = target.resolve(graph)?;

    match graph.make_link(from, to, types) {
        Ok(outcome) => {
            if outcome == LinkOutcome::Replaced {
                warn!(
                    node = target.node_id,
                    pin = target.pin,
                    "replaced existing link on data input"
                );
            }
            info!(
                source = source.node_id,
                source_pin = source.pin,
                target = target.node_id,
                target_pin = target.pin,
                ?outcome,
                "pins connected"
            );
            Ok(outcome)
        }
        Err(LinkError::NodeMissing(id)) => Err(AppError::not_found(format!("node '{id}'"))),
        Err(LinkError::PinMissing { node, pin, direction }) => Err(AppError::not_found(format!(
            "{} pin '{pin}' on node '{node}'",
            match direction {
                PinDirection::Input => "input",
                PinDirection::Output => "output",
            }
        ))),
        Err(e @ (LinkError::SameNode | LinkError::Incompatible { .. })) => {
            Err(AppError::ConnectionFailed {
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{Blueprint, Position};
    use crate::reflect::ClassDb;

    fn graph_with(db: &ClassDb) -> (Graph, String, String) {
        let mut bp = Blueprint::new("PlayerChar", "Character");
        bp.generated_class = None;
        let mut graph = Graph::new("EventGraph");
        let begin = crate::factory::event_node(&bp, db, "BeginPlay", Position::default()).unwrap();
        let (owner, sig) = db.find_function("Character", "Jump").unwrap();
        let jump = crate::factory::function_call_node(&owner.name, sig, Position::new(300.0, 0.0));
        let a = graph.add_node(begin).to_string();
        let b = graph.add_node(jump).to_string();
        (graph, a, b)
    }

    #[test]
    fn test_connect_existing_pins() {
        let db = ClassDb::builtin();
        let (mut graph, begin, jump) = graph_with(&db);
        let outcome = connect(
            &mut graph,
            &db,
            PinAddress::new(&begin, "then"),
            PinAddress::new(&jump, "execute"),
        )
        .unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(graph.links().len(), 1);
    }

    #[test]
    fn test_unknown_node_is_not_found() {
        let db = ClassDb::builtin();
        let (mut graph, _, jump) = graph_with(&db);
        let ghost = NodeId::new().to_string();
        for bad in [ghost.as_str(), "garbage"] {
            let err = connect(
                &mut graph,
                &db,
                PinAddress::new(bad, "then"),
                PinAddress::new(&jump, "execute"),
            )
            .unwrap_err();
            assert_eq!(err.code(), "not_found");
        }
        assert!(graph.links().is_empty());
    }

    #[test]
    fn test_missing_pin_and_rejected_link() {
        let db = ClassDb::builtin();
        let (mut graph, begin, jump) = graph_with(&db);
        let err = connect(
            &mut graph,
            &db,
            PinAddress::new(&begin, "Then"),
            PinAddress::new(&jump, "execute"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), format!("not_found: output pin 'Then' on node '{begin}'"));

        let err = connect(
            &mut graph,
            &db,
            PinAddress::new(&begin, "then"),
            PinAddress::new(&jump, "self"),
        )
        .unwrap_err();
        assert_eq!(err.code(), "connection_failed");
        assert!(graph.links().is_empty());
    }
}
