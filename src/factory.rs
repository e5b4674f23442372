//! Node construction: one builder per node kind, plus placement of function
//! calls together with the node that supplies their target instance.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::coerce;
use crate::error::AppError;
use crate::model::pin::{EXEC_IN_PIN, EXEC_OUT_PIN, RETURN_PIN};
use crate::model::{
    Blueprint, Node, NodeId, NodeKind, Pin, PinDirection, PinRef, PinType, Position, SELF_PIN,
};
use crate::reflect::{FunctionSig, ParamDef, TypeRegistry};
use crate::target::{self, TargetInstance};
use crate::workspace::BlueprintEdit;

/// Offset of the instance node relative to the call it feeds.
const INSTANCE_NODE_OFFSET: (f64, f64) = (-200.0, 50.0);

const INPUT_ACTION_PRESSED: &str = "Pressed";
const INPUT_ACTION_RELEASED: &str = "Released";
const INPUT_ACTION_KEY: &str = "Key";

/// Event node bound to an event of the blueprint's behavior class.
pub fn event_node(
    blueprint: &Blueprint,
    types: &dyn TypeRegistry,
    event_name: &str,
    position: Position,
) -> Result<Node, AppError> {
    let class = blueprint.behavior_class();
    let (owner, sig) =
        types
            .find_event(class, event_name)
            .ok_or_else(|| AppError::CreationFailed {
                message: format!("event '{event_name}' is not defined on '{class}'"),
            })?;

    let mut pins = vec![Pin::output(EXEC_OUT_PIN, PinType::Exec)];
    pins.extend(
        sig.params
            .iter()
            .map(|p| Pin::output(p.name.clone(), p.pin_type.clone())),
    );
    Ok(Node::new(
        NodeKind::Event {
            event_name: sig.name.clone(),
            owner_class: owner.name.clone(),
        },
        position,
        pins,
    ))
}

/// Call node for `sig` declared on `owner`.
pub fn function_call_node(owner: &str, sig: &FunctionSig, position: Position) -> Node {
    let mut pins = Vec::with_capacity(sig.params.len() + 4);
    if !sig.is_pure {
        pins.push(Pin::input(EXEC_IN_PIN, PinType::Exec));
        pins.push(Pin::output(EXEC_OUT_PIN, PinType::Exec));
    }
    if !sig.is_static {
        pins.push(Pin::input(SELF_PIN, PinType::Object(owner.to_string())));
    }
    pins.extend(sig.params.iter().map(param_pin));
    if let Some(ret) = &sig.returns {
        pins.push(Pin::output(RETURN_PIN, ret.clone()));
    }
    Node::new(
        NodeKind::FunctionCall {
            function_name: sig.name.clone(),
            owner_class: owner.to_string(),
            is_static: sig.is_static,
            is_pure: sig.is_pure,
        },
        position,
        pins,
    )
}

fn param_pin(param: &ParamDef) -> Pin {
    if param.output {
        Pin::output(param.name.clone(), param.pin_type.clone())
    } else {
        Pin::input(param.name.clone(), param.pin_type.clone())
    }
}

/// Getter for a member of the blueprint. The name is not checked against
/// the declared members; the output is typed from whatever declaration
/// matches, or left as a wildcard.
pub fn variable_get_node(blueprint: &Blueprint, variable_name: &str, position: Position) -> Node {
    let pin_type = if let Some(component) = blueprint.component(variable_name) {
        PinType::Object(component.class.clone())
    } else if let Some(var) = blueprint.variable(variable_name) {
        var.pin_type.clone()
    } else {
        warn!(
            blueprint = %blueprint.name,
            variable = variable_name,
            "getter for undeclared member"
        );
        PinType::Wildcard
    };
    Node::new(
        NodeKind::VariableGet {
            variable_name: variable_name.to_string(),
        },
        position,
        vec![Pin::output(variable_name, pin_type)],
    )
}

pub fn input_action_node(
    types: &dyn TypeRegistry,
    action_name: &str,
    position: Position,
) -> Result<Node, AppError> {
    let action = types
        .input_action(action_name)
        .ok_or_else(|| AppError::CreationFailed {
            message: format!("input action '{action_name}' is not defined"),
        })?;
    Ok(Node::new(
        NodeKind::InputAction {
            action_name: action.name.clone(),
        },
        position,
        vec![
            Pin::output(INPUT_ACTION_PRESSED, PinType::Exec),
            Pin::output(INPUT_ACTION_RELEASED, PinType::Exec),
            Pin::output(INPUT_ACTION_KEY, PinType::Struct("Key".to_string())),
        ],
    ))
}

pub fn self_node(blueprint: &Blueprint, position: Position) -> Node {
    Node::new(
        NodeKind::SelfReference,
        position,
        vec![Pin::output(
            SELF_PIN,
            PinType::Object(blueprint.behavior_class().to_string()),
        )],
    )
}

/// Append a node to the blueprint's event graph.
pub fn place(edit: &mut BlueprintEdit<'_>, node: Node) -> NodeId {
    let label = node.kind.title();
    let id = edit.event_graph().add_node(node);
    info!(blueprint = %edit.blueprint.name, node = %id, %label, "node added");
    id
}

/// Arguments of [`place_function_call`].
#[derive(Debug, Clone, Copy)]
pub struct FunctionCallRequest<'p> {
    pub function_name: &'p str,
    /// Empty for "self".
    pub target: &'p str,
    pub position: Position,
    pub params: Option<&'p Map<String, Value>>,
}

/// Place a call node and, for instance calls, the component getter or self
/// node wired into its `self` pin. Literal params are applied last.
///
/// All-or-nothing: lookups happen before any node is added, and a failure to
/// wire the instance node removes everything this call added.
pub fn place_function_call(
    edit: &mut BlueprintEdit<'_>,
    request: &FunctionCallRequest<'_>,
) -> Result<NodeId, AppError> {
    let types = edit.types;
    let resolved = target::resolve_target(edit.blueprint, types, request.target)?;
    let (owner, sig) = target::find_function(types, &resolved, request.function_name)?;

    let call = function_call_node(&owner, &sig, request.position);
    let wants_instance = call.find_pin(SELF_PIN, PinDirection::Input).is_some();
    let (dx, dy) = INSTANCE_NODE_OFFSET;
    let aux_position = request.position.offset(dx, dy);
    let instance = match (&resolved.instance, wants_instance) {
        (Some(TargetInstance::Component { name }), true) => Some((
            variable_get_node(edit.blueprint, name, aux_position),
            name.clone(),
        )),
        (Some(TargetInstance::SelfObject), true) => Some((
            self_node(edit.blueprint, aux_position),
            SELF_PIN.to_string(),
        )),
        _ => None,
    };

    let blueprint_name = edit.blueprint.name.clone();
    let graph = edit.blueprint.find_or_create_event_graph();
    let checkpoint = graph.checkpoint();
    let call_id = graph.add_node(call);

    if let Some((node, out_pin)) = instance {
        let instance_id = graph.add_node(node);
        if let Err(e) = graph.make_link(
            PinRef::new(instance_id, out_pin),
            PinRef::new(call_id, SELF_PIN),
            types,
        ) {
            graph.rollback(checkpoint);
            return Err(AppError::CreationFailed {
                message: format!(
                    "could not bind '{}' to its target: {e}",
                    request.function_name
                ),
            });
        }
        debug!(call = %call_id, instance = %instance_id, "instance node wired");
    }

    if let Some(params) = request.params {
        let applied = coerce::apply_literals(graph, call_id, params);
        debug!(call = %call_id, applied, supplied = params.len(), "literal params applied");
    }

    info!(
        blueprint = %blueprint_name,
        node = %call_id,
        function = %sig.name,
        owner = %owner,
        is_static = resolved.is_static,
        "function call added"
    );
    Ok(call_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reflect::{ClassDb, ClassDef, InputActionDef};
    use crate::workspace::Workspace;

    fn workspace() -> Workspace {
        Workspace::from_catalog(
            ClassDb::builtin(),
            vec![Blueprint::new("PlayerChar", "Character")
                .with_component("StaticMeshComponent1", "StaticMeshComponent")],
        )
    }

    fn call<'a>(function_name: &'a str, target: &'a str) -> FunctionCallRequest<'a> {
        FunctionCallRequest {
            function_name,
            target,
            position: Position::new(400.0, 100.0),
            params: None,
        }
    }

    #[test]
    fn test_event_node_pins_follow_signature() {
        let ws = workspace();
        let bp = ws.blueprint("PlayerChar").unwrap();
        let node = event_node(bp, ws.types(), "Tick", Position::default()).unwrap();
        assert_eq!(node.kind.type_name(), "Event");
        assert!(node.find_pin("then", PinDirection::Output).is_some());
        let delta = node.find_pin("DeltaSeconds", PinDirection::Output).unwrap();
        assert_eq!(delta.pin_type, PinType::Float);

        let err = event_node(bp, ws.types(), "Teleported", Position::default()).unwrap_err();
        assert_eq!(err.code(), "creation_failed");
    }

    #[test]
    fn test_input_action_requires_known_action() {
        let db = ClassDb::builtin();
        let node = input_action_node(&db, "Jump", Position::default()).unwrap();
        assert_eq!(node.pins.len(), 3);
        assert!(input_action_node(&db, "Dance", Position::default()).is_err());
    }

    #[test]
    fn test_pure_static_call_has_no_exec_or_self() {
        let db = ClassDb::builtin();
        let (owner, sig) = db.find_function("KismetMathLibrary", "Add_IntInt").unwrap();
        let node = function_call_node(&owner.name, sig, Position::default());
        let names: Vec<&str> = node.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "ReturnValue"]);
    }

    #[test]
    fn test_self_call_wires_self_node() {
        let mut ws = workspace();
        let mut edit = ws.edit("PlayerChar").unwrap();
        let id = place_function_call(&mut edit, &call("Jump", "")).unwrap();

        let graph = ws.blueprint("PlayerChar").unwrap().event_graph().unwrap();
        assert_eq!(graph.nodes().len(), 2);
        let link = graph.links().first().unwrap();
        assert_eq!(link.to, PinRef::new(id, SELF_PIN));
        let self_ref = graph.node(link.from.node).unwrap();
        assert_eq!(self_ref.kind, NodeKind::SelfReference);
        assert_eq!(self_ref.position, Position::new(200.0, 150.0));
    }

    #[test]
    fn test_static_call_adds_single_node() {
        let mut ws = workspace();
        let mut edit = ws.edit("PlayerChar").unwrap();
        place_function_call(&mut edit, &call("PrintString", "KismetSystemLibrary")).unwrap();

        let graph = ws.blueprint("PlayerChar").unwrap().event_graph().unwrap();
        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.links().is_empty());
    }

    #[test]
    fn test_component_call_wires_getter_and_applies_literals() {
        let mut ws = workspace();
        let params = json!({ "bNewVisibility": false, "Unknown": 1 });
        let mut request = call("SetVisibility", "StaticMeshComponent1");
        request.params = params.as_object();

        let mut edit = ws.edit("PlayerChar").unwrap();
        let id = place_function_call(&mut edit, &request).unwrap();

        let graph = ws.blueprint("PlayerChar").unwrap().event_graph().unwrap();
        let link = graph.links().first().unwrap();
        assert_eq!(link.from.pin, "StaticMeshComponent1");
        assert_eq!(link.to, PinRef::new(id, SELF_PIN));
        let getter = graph.node(link.from.node).unwrap();
        assert_eq!(
            getter.kind,
            NodeKind::VariableGet {
                variable_name: "StaticMeshComponent1".into()
            }
        );

        let pin = graph
            .node(id)
            .unwrap()
            .find_pin("bNewVisibility", PinDirection::Input)
            .unwrap();
        assert_eq!(pin.default_value.as_deref(), Some("false"));
    }

    /// Resolves functions on any class through an `Interactable` fallback,
    /// so a call can be found for a target whose type cannot feed it.
    struct InterfaceCalls(ClassDb);

    impl TypeRegistry for InterfaceCalls {
        fn class(&self, name: &str) -> Option<&ClassDef> {
            self.0.class(name)
        }

        fn resolve_type(&self, query: &str) -> Option<&ClassDef> {
            self.0.resolve_type(query)
        }

        fn input_action(&self, name: &str) -> Option<&InputActionDef> {
            self.0.input_action(name)
        }

        fn find_function(&self, class: &str, function: &str) -> Option<(&ClassDef, &FunctionSig)> {
            self.0
                .find_function(class, function)
                .or_else(|| self.0.find_function("Interactable", function))
        }
    }

    #[test]
    fn test_unbindable_target_rolls_back() {
        let mut db = ClassDb::builtin();
        db.insert(ClassDef {
            name: "Interactable".into(),
            prefix: "U".into(),
            package: "/Script/Game".into(),
            parent: None,
            functions: vec![FunctionSig {
                name: "Interact".into(),
                is_static: false,
                is_pure: false,
                params: vec![],
                returns: None,
            }],
            events: vec![],
        });
        let mut ws = Workspace::new(InterfaceCalls(db));
        ws.insert_blueprint(
            Blueprint::new("PlayerChar", "Character")
                .with_component("StaticMeshComponent1", "StaticMeshComponent"),
        );

        let mut edit = ws.edit("PlayerChar").unwrap();
        let err = place_function_call(&mut edit, &call("Interact", "StaticMeshComponent1"))
            .unwrap_err();
        assert_eq!(err.code(), "creation_failed");
        assert!(err.to_string().contains("could not bind 'Interact'"));

        let graph = ws.blueprint("PlayerChar").unwrap().event_graph().unwrap();
        assert!(graph.nodes().is_empty());
        assert!(graph.links().is_empty());
    }

    #[test]
    fn test_failed_lookup_adds_nothing() {
        let mut ws = workspace();
        let mut edit = ws.edit("PlayerChar").unwrap();
        let err = place_function_call(&mut edit, &call("Fly", "")).unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert!(ws.blueprint("PlayerChar").unwrap().event_graph().is_none());
    }
}
