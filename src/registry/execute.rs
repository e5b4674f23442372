use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::workspace::Workspace;

use super::{Command, CommandOutput};

/// Execute a Command against the workspace.
/// This is the single dispatch point for all surfaces (HTTP, CLI, tests).
pub fn execute(workspace: &mut Workspace, cmd: Command) -> Result<CommandOutput, AppError> {
    let name = cmd.info().name;
    debug!(command = name, "dispatching");
    let result = cmd.dispatch(workspace);
    match &result {
        Ok(output) => info!(command = name, message = %output.message, "command completed"),
        Err(e) => warn!(command = name, error = %e, "command failed"),
    }
    result
}

/// Validate `params` for the named command and execute it.
/// Unknown names and missing or malformed params fail before any handler runs.
pub fn dispatch(
    workspace: &mut Workspace,
    name: &str,
    params: &Value,
) -> Result<CommandOutput, AppError> {
    let cmd = Command::from_tool_call(name, params).inspect_err(|e| {
        warn!(command = name, error = %e, "rejected request");
    })?;
    execute(workspace, cmd)
}

/// The response envelope: the result's fields on success, or a single
/// `error` message.
pub fn respond(result: Result<CommandOutput, AppError>) -> Value {
    match result {
        Ok(output) => output.result.into_data(),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

/// `dispatch` followed by `respond`.
pub fn handle(workspace: &mut Workspace, name: &str, params: &Value) -> Value {
    respond(dispatch(workspace, name, params))
}
