use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Position;

/// Read an optional `[x, y]` pair, defaulting to the origin.
pub(crate) fn position_of(node_position: Option<[f64; 2]>) -> Position {
    node_position.map(Position::from).unwrap_or_default()
}

// ── Node params ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct AddEventNodeParams {
    pub blueprint_name: String,
    /// Event on the blueprint's class, e.g. "BeginPlay" or "Tick".
    pub event_name: String,
    /// `[x, y]` position in the graph. Defaults to `[0, 0]`.
    #[serde(default)]
    pub node_position: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct AddFunctionNodeParams {
    pub blueprint_name: String,
    pub function_name: String,
    #[serde(default)]
    pub node_position: Option<[f64; 2]>,
    /// Component name, type name (e.g. "GameplayStatics"), or omitted for self.
    #[serde(default)]
    pub target: Option<String>,
    /// Literal values for input pins, keyed by pin name. Strings, numbers,
    /// booleans and `[x, y, z]` arrays are accepted; anything else is ignored.
    #[serde(default)]
    #[cfg_attr(feature = "ts-bindings", ts(type = "Record<string, unknown> | null"))]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct ComponentReferenceParams {
    pub blueprint_name: String,
    pub component_name: String,
    #[serde(default)]
    pub node_position: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct AddInputActionNodeParams {
    pub blueprint_name: String,
    pub action_name: String,
    #[serde(default)]
    pub node_position: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct SelfReferenceParams {
    pub blueprint_name: String,
    #[serde(default)]
    pub node_position: Option<[f64; 2]>,
}

// ── Wiring params ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct ConnectNodesParams {
    pub blueprint_name: String,
    pub source_node_id: String,
    pub target_node_id: String,
    /// Output pin on the source node.
    pub source_pin: String,
    /// Input pin on the target node.
    pub target_pin: String,
}

// ── Variable params ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct AddVariableParams {
    pub blueprint_name: String,
    pub variable_name: String,
    /// One of Boolean, Integer (or Int), Float, String, Vector.
    pub variable_type: String,
    /// Show the variable in the details panel.
    #[serde(default)]
    pub is_exposed: bool,
}

// ── Query params ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct FindNodesParams {
    pub blueprint_name: String,
    /// Event, InputAction, FunctionCall, VariableGet or Self.
    pub node_type: String,
    /// Required when `node_type` is "Event".
    #[serde(default)]
    pub event_name: Option<String>,
    /// Required when `node_type` is "InputAction".
    #[serde(default)]
    pub action_name: Option<String>,
    /// Required when `node_type` is "FunctionCall".
    #[serde(default)]
    pub function_name: Option<String>,
    /// Required when `node_type` is "VariableGet".
    #[serde(default)]
    pub variable_name: Option<String>,
}

impl FindNodesParams {
    /// Discriminator field by wire name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "event_name" => self.event_name.as_deref(),
            "action_name" => self.action_name.as_deref(),
            "function_name" => self.function_name.as_deref(),
            "variable_name" => self.variable_name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct BlueprintNameParams {
    pub blueprint_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct HelpParams {
    /// Category name or command name to get details for (e.g. "nodes",
    /// "add_blueprint_function_node"). Omit to see all categories.
    #[serde(default)]
    pub topic: Option<String>,
}

// ── Results ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct NodeCreated {
    pub node_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct NodesConnected {
    pub source_node_id: String,
    pub target_node_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct VariableAdded {
    pub variable_name: String,
    pub variable_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct NodesFound {
    pub node_guids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct HelpText {
    pub text: String,
}
