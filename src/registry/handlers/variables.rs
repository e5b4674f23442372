#![allow(clippy::needless_pass_by_value)]

use tracing::info;

use crate::error::AppError;
use crate::model::{MemberVariable, PinType};
use crate::registry::params::{AddVariableParams, VariableAdded};
use crate::registry::validation::{validate_member_name, validate_unique_member};
use crate::registry::{CommandOutput, CommandResult};
use crate::workspace::Workspace;

pub fn add_variable(
    workspace: &mut Workspace,
    p: AddVariableParams,
) -> Result<CommandOutput, AppError> {
    let edit = workspace.edit(&p.blueprint_name)?;
    let pin_type =
        PinType::from_variable_type(&p.variable_type).ok_or_else(|| AppError::UnsupportedType {
            type_name: p.variable_type.clone(),
        })?;
    validate_member_name(&p.variable_name)?;
    validate_unique_member(edit.blueprint, &p.variable_name)?;

    edit.blueprint.variables.push(MemberVariable {
        name: p.variable_name.clone(),
        pin_type: pin_type.clone(),
        exposed: p.is_exposed,
    });
    info!(
        blueprint = %p.blueprint_name,
        variable = %p.variable_name,
        %pin_type,
        exposed = p.is_exposed,
        "variable declared"
    );
    edit.mark_modified();

    Ok(CommandOutput::new(
        format!(
            "Added {} variable {} to {}.",
            p.variable_type, p.variable_name, p.blueprint_name
        ),
        CommandResult::AddBlueprintVariable(VariableAdded {
            variable_name: p.variable_name,
            variable_type: p.variable_type,
        }),
    ))
}
