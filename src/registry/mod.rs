pub mod catalog;
pub mod execute;
pub mod handlers;
pub mod params;
pub mod validation;

use serde::{Deserialize, Serialize};

// ── Param types (used in Command enum) ──────────────────────────
use params::{
    AddEventNodeParams, AddFunctionNodeParams, AddInputActionNodeParams, AddVariableParams,
    BlueprintNameParams, ComponentReferenceParams, ConnectNodesParams, FindNodesParams,
    HelpParams, SelfReferenceParams,
};

// ── Return types (used in CommandResult enum) ───────────────────
use crate::describe::BlueprintDescription;
use params::{HelpText, NodeCreated, NodesConnected, NodesFound, VariableAdded};

// ── Handler modules (dispatch targets) ──────────────────────────
use handlers::{graph, nodes, query, variables};

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub enum CommandCategory {
    Nodes,
    Wiring,
    Variables,
    Query,
}

impl CommandCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Wiring => "wiring",
            Self::Variables => "variables",
            Self::Query => "query",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Nodes => "Place event, function call, getter, input action and self nodes",
            Self::Wiring => "Connect pins between nodes",
            Self::Variables => "Declare member variables",
            Self::Query => "Find nodes, describe blueprints, discover commands",
        }
    }

    pub fn all() -> &'static [CommandCategory] {
        &[Self::Nodes, Self::Wiring, Self::Variables, Self::Query]
    }
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    /// Changes a blueprint on success.
    pub mutating: bool,
}

// ── Command output ──────────────────────────────────────────────

/// Internal result of executing a Command.
/// `message` serves logs and the CLI, `result` carries the typed response.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub message: String,
    pub result: CommandResult,
}

impl CommandOutput {
    pub fn new(message: impl Into<String>, result: CommandResult) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }
}

// ── define_commands! macro ──────────────────────────────────────

/// Single source of truth for all commands. Generates:
/// 1. `Command` enum (serde-tagged)
/// 2. `CommandResult` enum (serde-tagged)
/// 3. `Command::info()`: metadata (name, description, category, mutating)
/// 4. `Command::dispatch()`: run the handler against a workspace
/// 5. `Command::registry_entries()`: catalog entries with JSON schemas
/// 6. `Command::from_tool_call()`: validate and deserialize a (name, JSON) pair
/// 7. `CommandResult::into_data()`: the bare result fields of the response
macro_rules! define_commands {
    (
        $(
            [ $pc:expr $(, $pf:ident)* ]
            $pv:ident ( $pp:ty ) -> $pr:ty
            => $ph:path, $pn:literal : $pd:literal ;
        )*
    ) => {
        // ── 1. Command enum ──
        /// Every surface (HTTP, CLI, tests) dispatches through the same executor.
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
        #[cfg_attr(feature = "ts-bindings", ts(export))]
        #[serde(tag = "command", content = "params")]
        pub enum Command {
            $( $pv($pp), )*
        }

        // ── 2. CommandResult enum ──
        #[derive(Debug, Clone, Serialize)]
        #[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
        #[cfg_attr(feature = "ts-bindings", ts(export))]
        #[serde(tag = "command", content = "data")]
        pub enum CommandResult {
            $( $pv($pr), )*
        }

        // ── 3. Command::info() ──
        impl Command {
            pub fn info(&self) -> CommandInfo {
                match self {
                    $( Command::$pv(_) => CommandInfo {
                        name: $pn,
                        description: $pd,
                        category: $pc,
                        mutating: define_commands!(@has_flag mutating; $($pf)*),
                    }, )*
                }
            }
        }

        // ── 4. Command::dispatch() ──
        impl Command {
            pub(crate) fn dispatch(
                self,
                workspace: &mut crate::workspace::Workspace,
            ) -> Result<CommandOutput, crate::error::AppError> {
                match self {
                    $( Command::$pv(p) => $ph(workspace, p), )*
                }
            }
        }

        // ── 5. Command::registry_entries() ──
        impl Command {
            pub(crate) fn registry_entries() -> Vec<catalog::CommandRegistryEntry> {
                vec![
                    $( catalog::entry(
                        CommandInfo {
                            name: $pn,
                            description: $pd,
                            category: $pc,
                            mutating: define_commands!(@has_flag mutating; $($pf)*),
                        },
                        catalog::schema_value::<$pp>(),
                    ), )*
                ]
            }
        }

        // ── 6. Command::from_tool_call() ──
        impl Command {
            pub(crate) fn from_tool_call(
                name: &str,
                input: &serde_json::Value,
            ) -> Result<Command, crate::error::AppError> {
                match name {
                    $( $pn => Ok(Command::$pv(catalog::de::<$pp>(input)?)), )*
                    _ => Err(crate::error::AppError::UnknownCommand {
                        name: name.to_string(),
                    }),
                }
            }
        }

        // ── 7. CommandResult::into_data() ──
        impl CommandResult {
            pub fn into_data(self) -> serde_json::Value {
                let value = match self {
                    $( CommandResult::$pv(d) => serde_json::to_value(d), )*
                };
                value.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
            }
        }
    };

    // Flag helpers: check whether a specific flag appears in a list of flags.
    (@has_flag mutating; mutating $($rest:ident)*) => { true };
    (@has_flag mutating; $_other:ident $($rest:ident)*) => { define_commands!(@has_flag mutating; $($rest)*) };
    (@has_flag mutating;) => { false };
}

// ── Command definitions ─────────────────────────────────────────

define_commands! {
    // ── Nodes (5, all mutating) ─────────────────────────────────
    [CommandCategory::Nodes, mutating]
    AddBlueprintEventNode(AddEventNodeParams) -> NodeCreated
    => nodes::add_event_node, "add_blueprint_event_node": "Add an event node bound to an event of the blueprint's class.";

    [CommandCategory::Nodes, mutating]
    AddBlueprintFunctionNode(AddFunctionNodeParams) -> NodeCreated
    => nodes::add_function_node, "add_blueprint_function_node": "Add a function call node. `target` may name a component, a type with static functions, or be omitted for self.";

    [CommandCategory::Nodes, mutating]
    AddBlueprintGetSelfComponentReference(ComponentReferenceParams) -> NodeCreated
    => nodes::add_component_reference, "add_blueprint_get_self_component_reference": "Add a getter node for a component of the blueprint.";

    [CommandCategory::Nodes, mutating]
    AddBlueprintInputActionNode(AddInputActionNodeParams) -> NodeCreated
    => nodes::add_input_action_node, "add_blueprint_input_action_node": "Add an input action event node.";

    [CommandCategory::Nodes, mutating]
    AddBlueprintSelfReference(SelfReferenceParams) -> NodeCreated
    => nodes::add_self_reference, "add_blueprint_self_reference": "Add a node yielding a reference to the blueprint's own instance.";

    // ── Wiring (1) ──────────────────────────────────────────────
    [CommandCategory::Wiring, mutating]
    ConnectBlueprintNodes(ConnectNodesParams) -> NodesConnected
    => graph::connect_nodes, "connect_blueprint_nodes": "Connect an output pin of one node to an input pin of another.";

    // ── Variables (1) ───────────────────────────────────────────
    [CommandCategory::Variables, mutating]
    AddBlueprintVariable(AddVariableParams) -> VariableAdded
    => variables::add_variable, "add_blueprint_variable": "Declare a member variable (Boolean, Integer, Float, String or Vector).";

    // ── Query (3) ───────────────────────────────────────────────
    [CommandCategory::Query]
    FindBlueprintNodes(FindNodesParams) -> NodesFound
    => query::find_nodes, "find_blueprint_nodes": "Find nodes by type and bound name. Returns node ids in graph order.";

    [CommandCategory::Query]
    DescribeBlueprint(BlueprintNameParams) -> BlueprintDescription
    => query::describe_blueprint, "describe_blueprint": "Summarize a blueprint: members, nodes, pins and links.";

    [CommandCategory::Query]
    Help(HelpParams) -> HelpText
    => query::help, "help": "Discover available commands. Call with no args for all categories, or with a topic for details.";
}
