#![allow(clippy::needless_pass_by_value)]

use crate::error::AppError;
use crate::factory::{self, FunctionCallRequest};
use crate::registry::params::{
    position_of, AddEventNodeParams, AddFunctionNodeParams, AddInputActionNodeParams,
    ComponentReferenceParams, NodeCreated, SelfReferenceParams,
};
use crate::registry::validation::validate_position;
use crate::registry::{CommandOutput, CommandResult};
use crate::workspace::Workspace;

pub fn add_event_node(
    workspace: &mut Workspace,
    p: AddEventNodeParams,
) -> Result<CommandOutput, AppError> {
    validate_position(p.node_position)?;
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let node = factory::event_node(
        edit.blueprint,
        edit.types,
        &p.event_name,
        position_of(p.node_position),
    )?;
    let id = factory::place(&mut edit, node);
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!("Added event node {} to {}.", p.event_name, p.blueprint_name),
        CommandResult::AddBlueprintEventNode(NodeCreated {
            node_id: id.to_string(),
        }),
    ))
}

pub fn add_function_node(
    workspace: &mut Workspace,
    p: AddFunctionNodeParams,
) -> Result<CommandOutput, AppError> {
    validate_position(p.node_position)?;
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let request = FunctionCallRequest {
        function_name: &p.function_name,
        target: p.target.as_deref().unwrap_or_default(),
        position: position_of(p.node_position),
        params: p.params.as_ref().and_then(serde_json::Value::as_object),
    };
    let id = factory::place_function_call(&mut edit, &request)?;
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!(
            "Added call to {} on {} in {}.",
            p.function_name,
            p.target.as_deref().filter(|t| !t.is_empty()).unwrap_or("self"),
            p.blueprint_name
        ),
        CommandResult::AddBlueprintFunctionNode(NodeCreated {
            node_id: id.to_string(),
        }),
    ))
}

pub fn add_component_reference(
    workspace: &mut Workspace,
    p: ComponentReferenceParams,
) -> Result<CommandOutput, AppError> {
    validate_position(p.node_position)?;
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let node = factory::variable_get_node(
        edit.blueprint,
        &p.component_name,
        position_of(p.node_position),
    );
    let id = factory::place(&mut edit, node);
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!("Added getter for {} in {}.", p.component_name, p.blueprint_name),
        CommandResult::AddBlueprintGetSelfComponentReference(NodeCreated {
            node_id: id.to_string(),
        }),
    ))
}

pub fn add_input_action_node(
    workspace: &mut Workspace,
    p: AddInputActionNodeParams,
) -> Result<CommandOutput, AppError> {
    validate_position(p.node_position)?;
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let node =
        factory::input_action_node(edit.types, &p.action_name, position_of(p.node_position))?;
    let id = factory::place(&mut edit, node);
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!("Added input action {} to {}.", p.action_name, p.blueprint_name),
        CommandResult::AddBlueprintInputActionNode(NodeCreated {
            node_id: id.to_string(),
        }),
    ))
}

pub fn add_self_reference(
    workspace: &mut Workspace,
    p: SelfReferenceParams,
) -> Result<CommandOutput, AppError> {
    validate_position(p.node_position)?;
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let node = factory::self_node(edit.blueprint, position_of(p.node_position));
    let id = factory::place(&mut edit, node);
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!("Added self reference to {}.", p.blueprint_name),
        CommandResult::AddBlueprintSelfReference(NodeCreated {
            node_id: id.to_string(),
        }),
    ))
}
