#![allow(clippy::needless_pass_by_value)]

use crate::describe;
use crate::error::AppError;
use crate::query::{self as node_query, NodeFilter};
use crate::registry::catalog;
use crate::registry::params::{
    BlueprintNameParams, FindNodesParams, HelpParams, HelpText, NodesFound,
};
use crate::registry::{CommandOutput, CommandResult};
use crate::workspace::Workspace;

pub fn find_nodes(workspace: &mut Workspace, p: FindNodesParams) -> Result<CommandOutput, AppError> {
    let filter = NodeFilter::from_request(&p.node_type, |name| p.field(name))?;
    let blueprint = workspace.blueprint(&p.blueprint_name)?;
    let ids = match &filter {
        Some(filter) => node_query::find_nodes(blueprint.event_graph(), filter),
        None => Vec::new(),
    };
    Ok(CommandOutput::new(
        format!(
            "Found {} {} node(s) in {}.",
            ids.len(),
            p.node_type,
            p.blueprint_name
        ),
        CommandResult::FindBlueprintNodes(NodesFound {
            node_guids: ids.iter().map(ToString::to_string).collect(),
        }),
    ))
}

pub fn describe_blueprint(
    workspace: &mut Workspace,
    p: BlueprintNameParams,
) -> Result<CommandOutput, AppError> {
    let blueprint = workspace.blueprint(&p.blueprint_name)?;
    let description = describe::describe(blueprint);
    Ok(CommandOutput::new(
        description.summary.clone(),
        CommandResult::DescribeBlueprint(description),
    ))
}

pub fn help(_workspace: &mut Workspace, p: HelpParams) -> Result<CommandOutput, AppError> {
    let text = catalog::help_text(p.topic.as_deref());
    Ok(CommandOutput::new(
        text.clone(),
        CommandResult::Help(HelpText { text }),
    ))
}
