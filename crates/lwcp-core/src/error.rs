//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::types::PlatformKind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Preview Pipeline Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No file or directory was given to preview")]
    InputMissing,

    #[error("File does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Unsupported file or directory for preview: {path}")]
    UnsupportedComponent { path: PathBuf },

    /// `platform` is set when the user backed out of the device prompt
    #[error("Preview selection was cancelled by user")]
    SelectionCancelled { platform: Option<PlatformKind> },

    #[error("{platform} preview failed: {detail}")]
    LaunchFailure { platform: PlatformKind, detail: String },

    #[error("The preview tool is not installed: {executable}")]
    ToolNotInstalled { executable: String },

    // ─────────────────────────────────────────────────────────────
    // Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Executable not found on PATH: {executable}")]
    ToolNotFound { executable: String },

    #[error("Failed to spawn process: {reason}")]
    ProcessSpawn { reason: String },

    #[error("Local development server error: {message}")]
    DevServer { message: String },

    #[error("Failed to open browser: {message}")]
    Browser { message: String },

    // ─────────────────────────────────────────────────────────────
    // Terminal Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration / State Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("State store error: {message}")]
    Store { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn unsupported_component(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedComponent { path: path.into() }
    }

    pub fn tool_not_found(executable: impl Into<String>) -> Self {
        Self::ToolNotFound {
            executable: executable.into(),
        }
    }

    pub fn dev_server(message: impl Into<String>) -> Self {
        Self::DevServer {
            message: message.into(),
        }
    }

    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
        }
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn selection_cancelled(platform: Option<PlatformKind>) -> Self {
        Self::SelectionCancelled { platform }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::path_not_found("/tmp/foo");
        assert_eq!(err.to_string(), "File does not exist: /tmp/foo");

        let err = Error::InputMissing;
        assert!(err.to_string().contains("No file or directory"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_launch_failure_display() {
        let err = Error::LaunchFailure {
            platform: PlatformKind::Android,
            detail: "exit code 1".to_string(),
        };
        assert_eq!(err.to_string(), "Android preview failed: exit code 1");
    }

    #[test]
    fn test_selection_cancelled_carries_stage() {
        let err = Error::selection_cancelled(Some(PlatformKind::IOS));
        assert!(matches!(
            err,
            Error::SelectionCancelled {
                platform: Some(PlatformKind::IOS)
            }
        ));
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::tool_not_found("sfdx");
        let _ = Error::dev_server("port in use");
        let _ = Error::browser("no handler");
        let _ = Error::terminal("raw mode");
        let _ = Error::config("bad toml");
        let _ = Error::store("locked");
    }
}
