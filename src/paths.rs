//! Centralized path definitions for configuration and project files.
//!
//! This module is the single source of truth for leaf filenames and
//! directory names. No other module should hard-code these strings.

use std::path::{Path, PathBuf};

// ── Application identity ─────────────────────────────────────────

pub const APP_ID: &str = "blueprint-bridge";

// ── Leaf filenames ───────────────────────────────────────────────

pub const SETTINGS_FILE: &str = "settings.json";
pub const PROJECT_FILE: &str = "project.json";

// ── Config-dir functions ─────────────────────────────────────────

/// Per-user config directory: `$XDG_CONFIG_HOME/<app>` on Linux,
/// `~/Library/Application Support/<app>` on macOS, `%APPDATA%\<app>` on Windows.
pub fn default_config_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") {
        std::env::var("APPDATA")
            .map_or_else(|_| PathBuf::from("C:\\Users\\Default\\AppData\\Roaming"), PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home_dir().join("Library/Application Support")
    } else {
        std::env::var("XDG_CONFIG_HOME")
            .map_or_else(|_| home_dir().join(".config"), PathBuf::from)
    };
    base.join(APP_ID)
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE)
}

/// Project file used when settings name none and `--project` is not given.
pub fn default_project_path(config_dir: &Path) -> PathBuf {
    config_dir.join(PROJECT_FILE)
}
