//! Configuration file parsing for the LWC preview launcher
//!
//! Supports:
//! - `.lwc-preview/config.toml` - Project settings

pub mod settings;
pub mod types;

pub use settings::{config_path, find_project_root, init_config_dir, load_settings, PROJECT_MARKER};
pub use types::*;
