//! Tool availability checking
//!
//! Resolves the configured CLI executable on `PATH` before launching it. On
//! Windows the tool ships as a `.cmd` shim, which `which` finds through
//! `PATHEXT`; the resolved path is passed to `Command::new` directly.

use std::path::{Path, PathBuf};

use lwcp_core::prelude::*;

/// Resolved location of the external CLI tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolAvailability {
    /// Executable name or path as configured (e.g. `sfdx`)
    pub executable: String,

    /// Absolute path if the executable was found
    pub resolved: Option<PathBuf>,
}

impl ToolAvailability {
    /// Look up `executable` on `PATH` (or as a path, if it contains a separator)
    pub fn check(executable: &str) -> Self {
        let resolved = match which::which(executable) {
            Ok(path) => {
                let path = dunce::simplified(&path).to_path_buf();
                debug!("Resolved {} to {}", executable, path.display());
                Some(path)
            }
            Err(e) => {
                debug!("Could not resolve {}: {}", executable, e);
                None
            }
        };

        Self {
            executable: executable.to_string(),
            resolved,
        }
    }

    pub fn is_available(&self) -> bool {
        self.resolved.is_some()
    }

    /// The resolved path, or an error naming the missing executable
    pub fn program(&self) -> Result<&Path> {
        self.resolved
            .as_deref()
            .ok_or_else(|| Error::tool_not_found(&self.executable))
    }
}
