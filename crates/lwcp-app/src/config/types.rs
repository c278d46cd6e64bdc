//! Configuration type definitions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lwcp_launcher::{DEFAULT_DEV_SERVER_URL, PREVIEW_ACTION};

/// Which argument shape the installed tool version expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// `-f /lwc/preview/<component>`
    #[default]
    Url,
    /// `-d <component>`
    Component,
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractKind::Url => write!(f, "url"),
            ContractKind::Component => write!(f, "component"),
        }
    }
}

/// Primary action and identifier flag for one tool version.
///
/// Selected once at startup and passed to the command builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliContract {
    pub kind: ContractKind,
    pub primary_action: String,
    pub identifier_flag: String,
}

impl CliContract {
    pub fn url() -> Self {
        Self {
            kind: ContractKind::Url,
            primary_action: PREVIEW_ACTION.to_string(),
            identifier_flag: "-f".to_string(),
        }
    }

    pub fn component() -> Self {
        Self {
            kind: ContractKind::Component,
            primary_action: PREVIEW_ACTION.to_string(),
            identifier_flag: "-d".to_string(),
        }
    }

    pub fn for_kind(kind: ContractKind) -> Self {
        match kind {
            ContractKind::Url => Self::url(),
            ContractKind::Component => Self::component(),
        }
    }
}

impl Default for CliContract {
    fn default() -> Self {
        Self::url()
    }
}

/// Application settings (.lwc-preview/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub preview: PreviewSettings,

    #[serde(default)]
    pub tool: ToolSettings,

    #[serde(default)]
    pub dev_server: DevServerSettings,

    /// Message template overrides keyed by stable message identifier
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl Settings {
    pub fn contract(&self) -> CliContract {
        CliContract::for_kind(self.preview.contract)
    }
}

/// Preview pipeline settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreviewSettings {
    /// Offer and store the last device name per platform
    #[serde(default)]
    pub remember_device: bool,

    /// Passed to the tool's `--loglevel`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Show the desktop browser option in the platform picker
    #[serde(default = "default_true")]
    pub include_desktop: bool,

    #[serde(default)]
    pub contract: ContractKind,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            remember_device: false,
            log_level: default_log_level(),
            include_desktop: true,
            contract: ContractKind::default(),
        }
    }
}

/// External CLI tool settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolSettings {
    /// Executable name or path
    #[serde(default = "default_executable")]
    pub executable: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DevServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How long to wait for a freshly started server to accept connections
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
}

impl Default for DevServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            start_timeout_secs: default_start_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_executable() -> String {
    "sfdx".to_string()
}

fn default_base_url() -> String {
    DEFAULT_DEV_SERVER_URL.to_string()
}

fn default_start_timeout_secs() -> u64 {
    60
}
