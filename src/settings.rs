use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::project::{read_json, write_json, ProjectError};

pub const DEFAULT_BIND: &str = "127.0.0.1:55557";
pub const DEFAULT_LOG_FILTER: &str = "info";

const SETTINGS_VERSION: u32 = 1;

/// Server settings stored in the per-user config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
pub struct ServerSettings {
    pub version: u32,
    /// Address the HTTP transport listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Project file to serve. None = start from the demo project.
    #[serde(default)]
    #[cfg_attr(feature = "ts-bindings", ts(type = "string | null"))]
    pub project_file: Option<PathBuf>,
    /// Save the project after every command that modified a blueprint.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_autosave() -> bool {
    true
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            bind: default_bind(),
            project_file: None,
            autosave: default_autosave(),
            log_filter: default_log_filter(),
        }
    }
}

/// Load settings from the config directory. Returns None if no settings file
/// exists or it cannot be parsed.
pub fn load_settings(config_dir: &Path) -> Option<ServerSettings> {
    let path = crate::paths::settings_path(config_dir);
    if !path.exists() {
        return None;
    }
    match read_json::<ServerSettings>(&path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            None
        }
    }
}

/// Save settings to the config directory.
pub fn save_settings(config_dir: &Path, settings: &ServerSettings) -> Result<(), ProjectError> {
    std::fs::create_dir_all(config_dir)?;
    write_json(&crate::paths::settings_path(config_dir), settings)
}
