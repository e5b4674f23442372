#![allow(clippy::needless_pass_by_value)]

use crate::error::AppError;
use crate::registry::params::{ConnectNodesParams, NodesConnected};
use crate::registry::{CommandOutput, CommandResult};
use crate::wiring::{self, PinAddress};
use crate::workspace::Workspace;

pub fn connect_nodes(
    workspace: &mut Workspace,
    p: ConnectNodesParams,
) -> Result<CommandOutput, AppError> {
    let mut edit = workspace.edit(&p.blueprint_name)?;
    let types = edit.types;
    let outcome = wiring::connect(
        edit.event_graph(),
        types,
        PinAddress::new(&p.source_node_id, &p.source_pin),
        PinAddress::new(&p.target_node_id, &p.target_pin),
    )?;
    edit.mark_modified();
    Ok(CommandOutput::new(
        format!(
            "Connected {}.{} -> {}.{} ({outcome:?}).",
            p.source_node_id, p.source_pin, p.target_node_id, p.target_pin
        ),
        CommandResult::ConnectBlueprintNodes(NodesConnected {
            source_node_id: p.source_node_id,
            target_node_id: p.target_node_id,
        }),
    ))
}
