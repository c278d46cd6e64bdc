//! Settings parser for .lwc-preview/config.toml

use std::path::{Path, PathBuf};

use lwcp_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = ".lwc-preview";

/// File that marks the root of a Salesforce DX project
pub const PROJECT_MARKER: &str = "sfdx-project.json";

/// Nearest ancestor of `start` (inclusive) containing `sfdx-project.json`.
///
/// `start` may be a file; its parent directory is searched first.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let first = if start.is_file() { start.parent()? } else { start };
    first
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}

pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `<project>/.lwc-preview/config.toml`.
///
/// A missing or unreadable file yields defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = config_path(project_path);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create `.lwc-preview/config.toml` with commented defaults.
///
/// An existing file is left alone. Returns the config file path.
pub fn init_config_dir(project_path: &Path) -> Result<PathBuf> {
    let config_dir = project_path.join(CONFIG_DIR);

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)
            .map_err(|e| Error::config(format!("Failed to create {} dir: {}", CONFIG_DIR, e)))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        info!("Config already exists at {:?}", config_path);
        return Ok(config_path);
    }

    let default_content = r#"# LWC Preview Configuration

[preview]
remember_device = false   # Offer the last device name used per platform
log_level = "warn"        # Passed to the tool as --loglevel
include_desktop = true    # Offer the desktop browser in the platform list
contract = "url"          # "url" (-f /lwc/preview/<name>) or "component" (-d <name>)

[tool]
executable = "sfdx"

[dev_server]
base_url = "http://localhost:3333"
start_timeout_secs = 60

[messages]
# Override any user-facing message by key, e.g.
# preview_execution_success = "Ran: {0}"
"#;

    std::fs::write(&config_path, default_content)
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    info!("Created default config at {:?}", config_path);

    Ok(config_path)
}
