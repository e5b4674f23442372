#![allow(clippy::needless_pass_by_value)]

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{CommandCategory, CommandInfo};
use crate::error::AppError;

/// A registry entry: metadata + JSON schema for the params.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub mutating: bool,
    pub param_schema: Value,
}

pub(super) fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub(super) fn schema_value<T: JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or_else(|_| empty_object_schema())
}

pub(super) fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        category: info.category,
        mutating: info.mutating,
        param_schema,
    }
}

/// Required property names of an object schema, in declaration order.
pub fn required_fields(schema: &Value) -> Vec<String> {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Vec::new();
    };
    let is_required = |name: &str| required.iter().any(|r| r.as_str() == Some(name));
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .keys()
                .filter(|k| is_required(k.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Deserialize command params. Every required field is checked for presence
/// first, so a request missing several reports the first one in declaration
/// order; absent and `null` count as missing.
pub(super) fn de<T: DeserializeOwned + JsonSchema>(input: &Value) -> Result<T, AppError> {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);
    for field in required_fields(&schema_value::<T>()) {
        if fields.get(&field).map_or(true, Value::is_null) {
            return Err(AppError::missing(field));
        }
    }

    let input = if input.is_null() {
        Value::Object(Map::new())
    } else {
        input.clone()
    };
    serde_json::from_value(input).map_err(|e| AppError::InvalidParameter {
        message: e.to_string(),
    })
}

/// The complete command registry, auto-generated from param struct schemas.
pub fn command_registry() -> Vec<CommandRegistryEntry> {
    super::Command::registry_entries()
}

/// Help text for command discovery.
/// Three tiers: no topic → categories, category → command list, command → full schema.
pub fn help_text(topic: Option<&str>) -> String {
    let registry = command_registry();

    match topic {
        None => {
            let mut lines = vec!["Available command categories:".to_string()];
            for cat in CommandCategory::all() {
                let count = registry.iter().filter(|e| e.category == *cat).count();
                if count > 0 {
                    lines.push(format!("  {} ({count}): {}", cat.slug(), cat.description()));
                }
            }
            lines.push(String::new());
            lines.push("Use help({topic: \"nodes\"}) to list commands in a category.".to_string());
            lines.push(
                "Use help({topic: \"add_blueprint_function_node\"}) for full parameter details."
                    .to_string(),
            );
            lines.join("\n")
        }
        Some(topic) => {
            // Command name first (full schema)
            if let Some(entry) = registry.iter().find(|e| e.name == topic) {
                let schema_str = serde_json::to_string_pretty(&entry.param_schema)
                    .unwrap_or_else(|_| "{}".to_string());
                return format!(
                    "{}: {}\nCategory: {} | Mutating: {}\n\nParameters:\n{}",
                    entry.name,
                    entry.description,
                    entry.category.slug(),
                    if entry.mutating { "yes" } else { "no" },
                    schema_str,
                );
            }

            // Then category name (command list)
            let cat_lower = topic.to_lowercase();
            let matching: Vec<&CommandRegistryEntry> = registry
                .iter()
                .filter(|e| e.category.slug() == cat_lower)
                .collect();

            if matching.is_empty() {
                format!("Unknown topic: \"{topic}\". Use help() to see categories and commands.")
            } else {
                let mut lines = vec![format!("{topic} commands:")];
                for entry in &matching {
                    lines.push(format!("  - {}: {}", entry.name, entry.description));
                }
                lines.push(String::new());
                lines.push("Use help({topic: \"command_name\"}) for parameter details.".to_string());
                lines.join("\n")
            }
        }
    }
}

/// JSON Schema formatted command list (for `GET /commands` and the CLI).
pub fn to_json_schema() -> Value {
    Value::Array(
        command_registry()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "description": e.description,
                    "category": e.category.slug(),
                    "mutating": e.mutating,
                    "inputSchema": e.param_schema,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::params::{AddFunctionNodeParams, ConnectNodesParams};

    #[test]
    fn test_required_fields_in_declaration_order() {
        let schema = schema_value::<ConnectNodesParams>();
        assert_eq!(
            required_fields(&schema),
            [
                "blueprint_name",
                "source_node_id",
                "target_node_id",
                "source_pin",
                "target_pin"
            ]
        );

        let schema = schema_value::<AddFunctionNodeParams>();
        assert_eq!(required_fields(&schema), ["blueprint_name", "function_name"]);
    }

    #[test]
    fn test_de_reports_first_missing_field() {
        let err = de::<ConnectNodesParams>(&json!({ "source_pin": "then" })).unwrap_err();
        assert_eq!(err, AppError::missing("blueprint_name"));

        let err = de::<ConnectNodesParams>(&json!({
            "blueprint_name": "PlayerChar",
            "source_node_id": null,
        }))
        .unwrap_err();
        assert_eq!(err, AppError::missing("source_node_id"));

        let err = de::<AddFunctionNodeParams>(&Value::Null).unwrap_err();
        assert_eq!(err, AppError::missing("blueprint_name"));
    }

    #[test]
    fn test_de_wrong_type_is_invalid_parameter() {
        let err = de::<AddFunctionNodeParams>(&json!({
            "blueprint_name": "PlayerChar",
            "function_name": "Jump",
            "node_position": [1, 2, 3],
        }))
        .unwrap_err();
        assert_eq!(err.code(), "invalid_parameter");
    }

    #[test]
    fn test_every_command_is_listed() {
        let registry = command_registry();
        assert_eq!(registry.len(), 10);
        let mutating = registry.iter().filter(|e| e.mutating).count();
        assert_eq!(mutating, 7);
        assert!(registry.iter().any(|e| e.name == "find_blueprint_nodes"));
    }

    #[test]
    fn test_help_tiers() {
        let overview = help_text(None);
        assert!(overview.contains("nodes (5)"));

        let listing = help_text(Some("wiring"));
        assert!(listing.contains("connect_blueprint_nodes"));

        let detail = help_text(Some("add_blueprint_variable"));
        assert!(detail.contains("variable_type"));
        assert!(detail.contains("Mutating: yes"));

        assert!(help_text(Some("nonsense")).starts_with("Unknown topic"));
    }
}
