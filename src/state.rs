use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use crate::demo;
use crate::error::AppError;
use crate::paths;
use crate::project::{self, LoadedProject, ProjectCatalog, ProjectError};
use crate::registry::{execute, CommandOutput};
use crate::settings::ServerSettings;
use crate::workspace::Workspace;

/// Project file for a one-shot session: the explicit path, else the one in
/// settings, else `project.json` in the config directory.
pub fn resolve_project_path(
    explicit: Option<PathBuf>,
    settings: &ServerSettings,
    config_dir: &Path,
) -> PathBuf {
    explicit
        .or_else(|| settings.project_file.clone())
        .unwrap_or_else(|| paths::default_project_path(config_dir))
}

// ── Application State ──────────────────────────────────────────────

/// Host state shared by the HTTP API and the CLI. The workspace lock
/// serializes command execution.
pub struct AppState {
    pub workspace: Mutex<Workspace>,
    pub catalog: ProjectCatalog,
    pub settings: ServerSettings,
    /// Where the project is saved. None = in-memory only.
    pub project_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(loaded: LoadedProject, settings: ServerSettings, project_path: Option<PathBuf>) -> Self {
        Self {
            workspace: Mutex::new(loaded.workspace),
            catalog: loaded.catalog,
            settings,
            project_path,
        }
    }

    /// Open `project_path` (or the one named in settings). A path that does
    /// not exist yet starts from the demo project and is created on first save.
    pub fn open(settings: ServerSettings, project_path: Option<PathBuf>) -> Result<Self, ProjectError> {
        let project_path = project_path.or_else(|| settings.project_file.clone());
        let loaded = match project_path.as_deref() {
            Some(path) if path.exists() => project::load_project(path)?,
            Some(path) => {
                info!(path = %path.display(), "project file not found, starting from demo project");
                demo::create_demo_project()
            }
            None => {
                info!("no project file configured, serving demo project in memory");
                demo::create_demo_project()
            }
        };
        Ok(Self::new(loaded, settings, project_path))
    }

    /// Read-only access to the workspace. Locks the mutex for the duration of `f`.
    pub fn with_workspace<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Workspace) -> R,
    {
        let guard = self.workspace.lock();
        f(&guard)
    }

    /// Mutating access to the workspace. Locks the mutex for the duration of `f`.
    pub fn with_workspace_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Workspace) -> R,
    {
        let mut guard = self.workspace.lock();
        f(&mut guard)
    }

    /// Run one command. Autosaves when the command modified a blueprint.
    pub fn run(&self, name: &str, params: &Value) -> Result<CommandOutput, AppError> {
        self.with_workspace_mut(|workspace| {
            let result = execute::dispatch(workspace, name, params);
            if result.is_ok() && self.settings.autosave {
                if let Err(e) = self.persist(workspace) {
                    warn!(command = name, error = %e, "autosave failed");
                }
            }
            result
        })
    }

    /// `run`, answered as a response envelope.
    pub fn run_command(&self, name: &str, params: &Value) -> Value {
        execute::respond(self.run(name, params))
    }

    /// Save now if anything is modified.
    pub fn save(&self) -> Result<bool, ProjectError> {
        self.with_workspace_mut(|workspace| self.persist(workspace))
    }

    fn persist(&self, workspace: &mut Workspace) -> Result<bool, ProjectError> {
        let modified = workspace.modified_blueprints();
        if modified.is_empty() {
            return Ok(false);
        }
        let Some(path) = self.project_path.as_deref() else {
            workspace.clear_modified();
            return Ok(false);
        };
        project::save_project(path, workspace, &self.catalog)?;
        info!(blueprints = ?modified, "changes saved");
        workspace.clear_modified();
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::demo::DEMO_BLUEPRINT;

    fn temp_project(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bpbridge_test_state_{label}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("project.json")
    }

    #[test]
    fn test_autosave_after_mutation() {
        let path = temp_project("autosave");
        let state = AppState::open(ServerSettings::default(), Some(path.clone())).unwrap();
        assert!(!path.exists());

        let response = state.run_command(
            "add_blueprint_variable",
            &json!({
                "blueprint_name": DEMO_BLUEPRINT,
                "variable_name": "Health",
                "variable_type": "Float"
            }),
        );
        assert_eq!(response["variable_name"], "Health");
        assert!(path.exists());
        assert!(state.with_workspace(Workspace::modified_blueprints).is_empty());

        let reopened = AppState::open(ServerSettings::default(), Some(path)).unwrap();
        reopened.with_workspace(|ws| {
            assert!(ws.blueprint(DEMO_BLUEPRINT).unwrap().variable("Health").is_some());
        });
    }

    #[test]
    fn test_failed_command_does_not_save() {
        let path = temp_project("failed");
        let state = AppState::open(ServerSettings::default(), Some(path.clone())).unwrap();
        let response = state.run_command("add_blueprint_event_node", &json!({}));
        assert_eq!(response["error"], "missing_parameter: blueprint_name");
        assert!(!path.exists());
    }

    #[test]
    fn test_autosave_off_keeps_dirty_flags() {
        let path = temp_project("manual");
        let settings = ServerSettings {
            autosave: false,
            ..ServerSettings::default()
        };
        let state = AppState::open(settings, Some(path.clone())).unwrap();
        state.run_command(
            "add_blueprint_event_node",
            &json!({ "blueprint_name": DEMO_BLUEPRINT, "event_name": "BeginPlay" }),
        );
        assert!(!path.exists());
        assert_eq!(
            state.with_workspace(Workspace::modified_blueprints),
            vec![DEMO_BLUEPRINT.to_string()]
        );
        assert!(state.save().unwrap());
        assert!(path.exists());
        assert!(!state.save().unwrap());
    }

    #[test]
    fn test_run_reports_message() {
        let state = AppState::open(ServerSettings::default(), None).unwrap();
        let output = state
            .run(
                "add_blueprint_event_node",
                &json!({ "blueprint_name": DEMO_BLUEPRINT, "event_name": "BeginPlay" }),
            )
            .unwrap();
        assert_eq!(output.message, "Added event node BeginPlay to PlayerChar.");
        assert!(output.result.into_data()["node_id"].is_string());

        let err = state.run("no_such_command", &json!({})).unwrap_err();
        assert_eq!(err.code(), "unknown_command");
    }

    #[test]
    fn test_one_shot_edits_persist_in_config_dir() {
        let config_dir = temp_project("oneshot").with_file_name("config");
        let settings = ServerSettings::default();

        let path = resolve_project_path(None, &settings, &config_dir);
        assert_eq!(path, config_dir.join("project.json"));
        let first = AppState::open(settings.clone(), Some(path)).unwrap();
        let added = first.run_command(
            "add_blueprint_event_node",
            &json!({ "blueprint_name": DEMO_BLUEPRINT, "event_name": "BeginPlay" }),
        );
        assert!(added["node_id"].is_string());
        first.save().unwrap();

        let path = resolve_project_path(None, &settings, &config_dir);
        let second = AppState::open(settings, Some(path)).unwrap();
        let found = second.run_command(
            "find_blueprint_nodes",
            &json!({
                "blueprint_name": DEMO_BLUEPRINT,
                "node_type": "Event",
                "event_name": "BeginPlay"
            }),
        );
        assert_eq!(found["node_guids"].as_array().unwrap().len(), 1);
        assert_eq!(found["node_guids"][0], added["node_id"]);
    }

    #[test]
    fn test_explicit_project_path_wins() {
        let settings = ServerSettings {
            project_file: Some(PathBuf::from("/srv/configured.json")),
            ..ServerSettings::default()
        };
        let dir = Path::new("/tmp/bp");
        assert_eq!(
            resolve_project_path(Some(PathBuf::from("/a.json")), &settings, dir),
            PathBuf::from("/a.json")
        );
        assert_eq!(
            resolve_project_path(None, &settings, dir),
            PathBuf::from("/srv/configured.json")
        );
    }

    #[test]
    fn test_in_memory_project_clears_flags() {
        let state = AppState::open(ServerSettings::default(), None).unwrap();
        state.run_command(
            "add_blueprint_self_reference",
            &json!({ "blueprint_name": DEMO_BLUEPRINT }),
        );
        assert!(state.with_workspace(Workspace::modified_blueprints).is_empty());
    }
}
