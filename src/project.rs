use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{Blueprint, PinDirection, PinRef};
use crate::reflect::{ClassDb, ClassDef, InputActionDef};
use crate::workspace::Workspace;

/// Project file format version.
const PROJECT_VERSION: u32 = 1;

// ── Error type ──────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidProject(String),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Io(e) => write!(f, "I/O error: {e}"),
            ProjectError::Json(e) => write!(f, "JSON error: {e}"),
            ProjectError::InvalidProject(msg) => write!(f, "Invalid project: {msg}"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(e: std::io::Error) -> Self {
        ProjectError::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        ProjectError::Json(e)
    }
}

impl Serialize for ProjectError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ── JSON envelope types ─────────────────────────────────────────────

/// Project-specific reflection data layered on top of the builtin catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCatalog {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub input_actions: Vec<InputActionDef>,
}

impl ProjectCatalog {
    /// Builtin classes extended with this catalog's classes and actions.
    pub fn class_db(&self) -> ClassDb {
        let mut db = ClassDb::builtin();
        for class in &self.classes {
            db.insert(class.clone());
        }
        for action in &self.input_actions {
            db.insert_input_action(action.clone());
        }
        db
    }
}

#[derive(Serialize, Deserialize)]
struct ProjectFile {
    version: u32,
    #[serde(default)]
    blueprints: Vec<Blueprint>,
    #[serde(flatten)]
    catalog: ProjectCatalog,
}

/// A workspace ready to serve commands, plus the catalog it was built from
/// so it can be written back out.
pub struct LoadedProject {
    pub workspace: Workspace,
    pub catalog: ProjectCatalog,
}

impl LoadedProject {
    pub fn new(catalog: ProjectCatalog, blueprints: Vec<Blueprint>) -> Self {
        Self {
            workspace: Workspace::from_catalog(catalog.class_db(), blueprints),
            catalog,
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Per-file mutex map to serialize concurrent writes to the same path.
static FILE_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Atomically write bytes to a file using write-to-temp-then-rename.
///
/// A per-path lock serializes writers; the previous file is kept as `.bak`
/// (best-effort) before the temp file is renamed into place.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ProjectError> {
    let lock = FILE_LOCKS
        .lock()
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone();
    let _guard = lock.lock();

    let file_name = path.file_name().unwrap_or_default();

    let mut tmp_name = OsString::from(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(&tmp_name);

    let mut bak_name = OsString::from(file_name);
    bak_name.push(".bak");
    let bak_path = path.with_file_name(&bak_name);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if path.exists() {
        let _ = fs::rename(path, &bak_path);
    }

    fs::rename(&tmp_path, path)?;

    Ok(())
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProjectError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

// ── Save / Load ─────────────────────────────────────────────────────

/// Write every blueprint in `workspace` plus `catalog` to a project file.
pub fn save_project(
    path: &Path,
    workspace: &Workspace,
    catalog: &ProjectCatalog,
) -> Result<(), ProjectError> {
    let file = ProjectFile {
        version: PROJECT_VERSION,
        blueprints: workspace.blueprints().cloned().collect(),
        catalog: catalog.clone(),
    };
    write_json(path, &file)?;
    info!(
        path = %path.display(),
        blueprints = file.blueprints.len(),
        "project saved"
    );
    Ok(())
}

/// Node ids are unique across the project and every link runs from an
/// existing output pin to an existing input pin on another node.
fn check_graphs(blueprints: &[Blueprint]) -> Result<(), ProjectError> {
    let mut ids = HashSet::new();
    for bp in blueprints {
        let Some(graph) = bp.event_graph() else {
            continue;
        };
        if let Some(dup) = graph.nodes().iter().find(|n| !ids.insert(n.id)) {
            return Err(ProjectError::InvalidProject(format!(
                "duplicate node id '{}' in '{}'",
                dup.id, bp.name
            )));
        }
        let has_pin = |link_end: &PinRef, direction| {
            graph
                .node(link_end.node)
                .is_some_and(|n| n.find_pin(&link_end.pin, direction).is_some())
        };
        let dangling = graph.links().iter().find(|link| {
            link.from.node == link.to.node
                || !has_pin(&link.from, PinDirection::Output)
                || !has_pin(&link.to, PinDirection::Input)
        });
        if let Some(link) = dangling {
            return Err(ProjectError::InvalidProject(format!(
                "link {}.{} -> {}.{} in '{}' does not join an output pin to an input pin",
                link.from.node, link.from.pin, link.to.node, link.to.pin, bp.name
            )));
        }
    }
    Ok(())
}

/// Load a project file into a fresh workspace.
pub fn load_project(path: &Path) -> Result<LoadedProject, ProjectError> {
    let file: ProjectFile = read_json(path)?;
    if file.version > PROJECT_VERSION {
        return Err(ProjectError::InvalidProject(format!(
            "Project version {} is newer than supported version {}",
            file.version, PROJECT_VERSION
        )));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = file.blueprints.iter().find(|bp| !seen.insert(&bp.name)) {
        return Err(ProjectError::InvalidProject(format!(
            "duplicate blueprint '{}'",
            dup.name
        )));
    }
    check_graphs(&file.blueprints)?;

    info!(
        path = %path.display(),
        blueprints = file.blueprints.len(),
        classes = file.catalog.classes.len(),
        "project loaded"
    );
    Ok(LoadedProject::new(file.catalog, file.blueprints))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::model::{MemberVariable, PinType, Position};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path(label: &str) -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "bpbridge_project_{label}_{}_{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("project.json")
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("roundtrip");
        let catalog = ProjectCatalog {
            classes: vec![ClassDef {
                name: "DoorComponent".into(),
                prefix: "U".into(),
                package: "/Script/Game".into(),
                parent: Some("SceneComponent".into()),
                functions: vec![],
                events: vec![],
            }],
            input_actions: vec![InputActionDef {
                name: "Crouch".into(),
                keys: vec!["C".into()],
            }],
        };
        let mut bp = Blueprint::new("Door", "Actor").with_component("Hinge", "DoorComponent");
        bp.variables.push(MemberVariable {
            name: "Open".into(),
            pin_type: PinType::Boolean,
            exposed: true,
        });
        let mut loaded = LoadedProject::new(catalog.clone(), vec![bp]);
        {
            let mut edit = loaded.workspace.edit("Door").unwrap();
            let event = crate::factory::event_node(
                edit.blueprint,
                edit.types,
                "BeginPlay",
                Position::new(10.0, 20.0),
            )
            .unwrap();
            edit.event_graph().add_node(event);
            edit.mark_modified();
        }

        save_project(&path, &loaded.workspace, &loaded.catalog).unwrap();
        let reloaded = load_project(&path).unwrap();

        assert_eq!(reloaded.catalog, catalog);
        let door = reloaded.workspace.blueprint("Door").unwrap();
        assert_eq!(door.variables.len(), 1);
        assert_eq!(door.event_graph().unwrap().nodes().len(), 1);
        assert!(!door.is_modified());

        let types = reloaded.workspace.types();
        assert!(types.resolve_type("UDoorComponent").is_some());
        assert!(types.input_action("Crouch").is_some());
        assert!(types.input_action("Jump").is_some());
        assert!(types.class("Door_C").is_some());
    }

    #[test]
    fn test_save_keeps_backup() {
        let path = temp_path("backup");
        let loaded = LoadedProject::new(ProjectCatalog::default(), vec![]);
        save_project(&path, &loaded.workspace, &loaded.catalog).unwrap();
        save_project(&path, &loaded.workspace, &loaded.catalog).unwrap();
        assert!(path.with_file_name("project.json.bak").exists());
        assert!(!path.with_file_name("project.json.tmp").exists());
    }

    #[test]
    fn test_future_version_rejected() {
        let path = temp_path("future");
        atomic_write(&path, br#"{"version": 99, "blueprints": []}"#).unwrap();
        let err = load_project(&path).err().unwrap();
        assert!(matches!(err, ProjectError::InvalidProject(_)));
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_duplicate_blueprint_rejected() {
        let path = temp_path("dup");
        atomic_write(
            &path,
            br#"{"version": 1, "blueprints": [
                {"name": "A", "parent_class": "Actor"},
                {"name": "A", "parent_class": "Pawn"}
            ]}"#,
        )
        .unwrap();
        let err = load_project(&path).err().unwrap();
        assert_eq!(err.to_string(), "Invalid project: duplicate blueprint 'A'");
    }

    /// Save a project whose blueprints each hold a self call to `Jump`, and
    /// return the file as JSON for tampering.
    fn saved_with_calls(path: &Path, names: &[&str]) -> serde_json::Value {
        let blueprints = names.iter().map(|n| Blueprint::new(*n, "Character")).collect();
        let mut loaded = LoadedProject::new(ProjectCatalog::default(), blueprints);
        for name in names {
            let mut edit = loaded.workspace.edit(name).unwrap();
            let request = crate::factory::FunctionCallRequest {
                function_name: "Jump",
                target: "",
                position: Position::default(),
                params: None,
            };
            crate::factory::place_function_call(&mut edit, &request).unwrap();
            edit.mark_modified();
        }
        save_project(path, &loaded.workspace, &loaded.catalog).unwrap();
        read_json(path).unwrap()
    }

    #[test]
    fn test_node_id_shared_across_blueprints_rejected() {
        let path = temp_path("dupnode");
        let mut json = saved_with_calls(&path, &["A", "B"]);
        let first = json["blueprints"][0]["event_graph"]["nodes"][0]["id"].clone();
        json["blueprints"][1]["event_graph"]["nodes"][0]["id"] = first.clone();
        write_json(&path, &json).unwrap();

        let err = load_project(&path).err().unwrap();
        assert!(matches!(err, ProjectError::InvalidProject(_)));
        assert!(err
            .to_string()
            .contains(&format!("duplicate node id '{}' in 'B'", first.as_str().unwrap())));
    }

    #[test]
    fn test_dangling_link_rejected() {
        let path = temp_path("dangling");
        let json = saved_with_calls(&path, &["A"]);
        assert!(load_project(&path).is_ok());

        let mut missing_node = json.clone();
        missing_node["blueprints"][0]["event_graph"]["links"][0]["to"]["node"] =
            serde_json::json!(crate::model::NodeId::new());
        write_json(&path, &missing_node).unwrap();
        let err = load_project(&path).err().unwrap();
        assert!(err.to_string().contains("does not join an output pin to an input pin"));

        let mut wrong_pin = json;
        wrong_pin["blueprints"][0]["event_graph"]["links"][0]["from"]["pin"] =
            serde_json::json!("NoSuchPin");
        write_json(&path, &wrong_pin).unwrap();
        assert!(matches!(
            load_project(&path),
            Err(ProjectError::InvalidProject(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = temp_path("missing");
        assert!(matches!(load_project(&path), Err(ProjectError::Io(_))));
    }
}
