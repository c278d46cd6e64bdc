//! Core domain types for the preview pipeline

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::messages::{MessageKey, Messages};

/// Exit code the tool's shell wrapper uses when the preview plugin is missing
pub const TOOL_NOT_INSTALLED_EXIT_CODE: i32 = 127;

/// Preview platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Desktop,
    #[serde(rename = "ios")]
    IOS,
    Android,
}

impl PlatformKind {
    /// Name passed to the tool's `-p` flag. Empty for desktop.
    pub fn platform_name(&self) -> &'static str {
        match self {
            PlatformKind::Desktop => "",
            PlatformKind::IOS => "iOS",
            PlatformKind::Android => "Android",
        }
    }

    /// Device used when the user accepts the default. Empty for desktop.
    pub fn default_target_name(&self) -> &'static str {
        match self {
            PlatformKind::Desktop => "",
            PlatformKind::IOS => "SFDXSimulator",
            PlatformKind::Android => "SFDXEmulator",
        }
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, PlatformKind::Desktop)
    }

    /// Parse a platform from user input (`desktop`, `ios`, `android`), case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" | "browser" => Some(PlatformKind::Desktop),
            "ios" => Some(PlatformKind::IOS),
            "android" => Some(PlatformKind::Android),
            _ => None,
        }
    }

    pub fn label_key(&self) -> MessageKey {
        match self {
            PlatformKind::Desktop => MessageKey::DesktopLabel,
            PlatformKind::IOS => MessageKey::IosLabel,
            PlatformKind::Android => MessageKey::AndroidLabel,
        }
    }

    pub fn description_key(&self) -> MessageKey {
        match self {
            PlatformKind::Desktop => MessageKey::DesktopDescription,
            PlatformKind::IOS => MessageKey::IosDescription,
            PlatformKind::Android => MessageKey::AndroidDescription,
        }
    }

    pub fn start_key(&self) -> MessageKey {
        match self {
            PlatformKind::Desktop => MessageKey::DesktopStart,
            PlatformKind::IOS => MessageKey::IosStart,
            PlatformKind::Android => MessageKey::AndroidStart,
        }
    }

    pub fn failure_key(&self) -> MessageKey {
        match self {
            PlatformKind::Desktop => MessageKey::DesktopFailure,
            PlatformKind::IOS => MessageKey::IosFailure,
            PlatformKind::Android => MessageKey::AndroidFailure,
        }
    }

    /// Device prompt shown when no remembered device applies
    pub fn target_default_key(&self) -> Option<MessageKey> {
        match self {
            PlatformKind::Desktop => None,
            PlatformKind::IOS => Some(MessageKey::IosTargetDefault),
            PlatformKind::Android => Some(MessageKey::AndroidTargetDefault),
        }
    }

    /// Device prompt shown when a remembered device is offered
    pub fn target_remembered_key(&self) -> Option<MessageKey> {
        match self {
            PlatformKind::Desktop => None,
            PlatformKind::IOS => Some(MessageKey::IosTargetRemembered),
            PlatformKind::Android => Some(MessageKey::AndroidTargetRemembered),
        }
    }

    pub fn cancelled_key(&self) -> Option<MessageKey> {
        match self {
            PlatformKind::Desktop => None,
            PlatformKind::IOS => Some(MessageKey::IosCancelled),
            PlatformKind::Android => Some(MessageKey::AndroidCancelled),
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Desktop => write!(f, "Desktop"),
            PlatformKind::IOS => write!(f, "iOS"),
            PlatformKind::Android => write!(f, "Android"),
        }
    }
}

/// One entry of the platform picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformOption {
    pub id: PlatformKind,
    pub label: String,
    pub description: String,
    pub platform_name: String,
    pub default_target_name: String,
    /// Pre-selected when the picker opens
    pub picked: bool,
}

impl PlatformOption {
    pub fn new(id: PlatformKind, messages: &Messages) -> Self {
        Self {
            id,
            label: messages.localize(id.label_key(), &[]),
            description: messages.localize(id.description_key(), &[]),
            platform_name: id.platform_name().to_string(),
            default_target_name: id.default_target_name().to_string(),
            picked: id.is_desktop(),
        }
    }
}

/// The fixed, ordered platform catalog. Order is presentation order.
pub fn platform_catalog(messages: &Messages, include_desktop: bool) -> Vec<PlatformOption> {
    [PlatformKind::Desktop, PlatformKind::IOS, PlatformKind::Android]
        .into_iter()
        .filter(|kind| include_desktop || !kind.is_desktop())
        .map(|kind| PlatformOption::new(kind, messages))
        .collect()
}

/// A fully resolved preview request, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    source_path: PathBuf,
    platform: PlatformOption,
    resolved_target: String,
    component: String,
}

impl PreviewRequest {
    /// Build a request.
    ///
    /// A blank component identifier is rejected as unsupported. A blank target
    /// falls back to the platform's default device.
    pub fn new(
        source_path: impl Into<PathBuf>,
        platform: PlatformOption,
        resolved_target: impl Into<String>,
        component: impl Into<String>,
    ) -> Result<Self> {
        let source_path = source_path.into();
        let component = component.into();
        if component.trim().is_empty() {
            return Err(Error::unsupported_component(source_path));
        }

        let mut resolved_target = resolved_target.into();
        if resolved_target.is_empty() {
            resolved_target = platform.default_target_name.clone();
        }

        Ok(Self {
            source_path,
            platform,
            resolved_target,
            component,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn platform(&self) -> &PlatformOption {
        &self.platform
    }

    pub fn resolved_target(&self) -> &str {
        &self.resolved_target
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

/// How the tool process ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProcessExit {
    Code(i32),
    /// The process could not be run or was terminated without an exit code
    Error(String),
}

/// Interpreted outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Failure,
    /// A failure caused by the tool (or its plugin) being absent
    ToolNotInstalled,
}

/// Result of one tool invocation. Produced once per launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit: ProcessExit,
    pub platform: PlatformKind,
    /// Last error message the tool reported in its JSON envelope
    pub diagnostics: Option<String>,
    /// Tail of the output, oldest first
    pub recent_output: Vec<String>,
}

impl ExecutionOutcome {
    pub fn new(exit: ProcessExit, platform: PlatformKind) -> Self {
        Self {
            exit,
            platform,
            diagnostics: None,
            recent_output: Vec::new(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self.exit {
            ProcessExit::Code(0) => OutcomeKind::Success,
            ProcessExit::Code(TOOL_NOT_INSTALLED_EXIT_CODE) => OutcomeKind::ToolNotInstalled,
            _ => OutcomeKind::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind() == OutcomeKind::Success
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.exit {
            ProcessExit::Code(code) => Some(code),
            ProcessExit::Error(_) => None,
        }
    }

    /// The error a failed run stands for. `None` on success.
    pub fn error(&self, executable: &str) -> Option<Error> {
        match self.kind() {
            OutcomeKind::Success => None,
            OutcomeKind::ToolNotInstalled => Some(Error::ToolNotInstalled {
                executable: executable.to_string(),
            }),
            OutcomeKind::Failure => {
                let detail = match &self.exit {
                    ProcessExit::Code(code) => format!("exit code {}", code),
                    ProcessExit::Error(reason) => reason.clone(),
                };
                Some(Error::LaunchFailure {
                    platform: self.platform,
                    detail,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_with_desktop() {
        let catalog = platform_catalog(&Messages::new(), true);
        let ids: Vec<_> = catalog.iter().map(|o| o.id).collect();
        assert_eq!(
            ids,
            vec![PlatformKind::Desktop, PlatformKind::IOS, PlatformKind::Android]
        );
        assert!(catalog[0].picked);
        assert!(!catalog[1].picked);
        assert_eq!(catalog[0].platform_name, "");
        assert_eq!(catalog[0].default_target_name, "");
    }

    #[test]
    fn test_catalog_mobile_only() {
        let catalog = platform_catalog(&Messages::new(), false);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, PlatformKind::IOS);
        assert_eq!(catalog[0].default_target_name, "SFDXSimulator");
        assert_eq!(catalog[1].default_target_name, "SFDXEmulator");
        assert!(catalog.iter().all(|o| !o.picked));
    }

    #[test]
    fn test_platform_from_name() {
        assert_eq!(PlatformKind::from_name("iOS"), Some(PlatformKind::IOS));
        assert_eq!(
            PlatformKind::from_name(" ANDROID "),
            Some(PlatformKind::Android)
        );
        assert_eq!(
            PlatformKind::from_name("desktop"),
            Some(PlatformKind::Desktop)
        );
        assert_eq!(PlatformKind::from_name("windows"), None);
    }

    #[test]
    fn test_request_rejects_blank_component() {
        let option = PlatformOption::new(PlatformKind::Android, &Messages::new());
        let err = PreviewRequest::new("/x/lwc/foo", option, "", "  ").unwrap_err();
        assert!(matches!(err, Error::UnsupportedComponent { .. }));
    }

    #[test]
    fn test_request_blank_target_uses_default() {
        let option = PlatformOption::new(PlatformKind::Android, &Messages::new());
        let request = PreviewRequest::new("/x/lwc/foo", option, "", "c/foo").unwrap();
        assert_eq!(request.resolved_target(), "SFDXEmulator");
        assert_eq!(request.component(), "c/foo");
    }

    #[test]
    fn test_outcome_kinds() {
        let ok = ExecutionOutcome::new(ProcessExit::Code(0), PlatformKind::IOS);
        assert_eq!(ok.kind(), OutcomeKind::Success);

        let missing = ExecutionOutcome::new(ProcessExit::Code(127), PlatformKind::IOS);
        assert_eq!(missing.kind(), OutcomeKind::ToolNotInstalled);
        assert!(!missing.is_success());

        let failed = ExecutionOutcome::new(ProcessExit::Code(1), PlatformKind::Android);
        assert_eq!(failed.kind(), OutcomeKind::Failure);

        let errored = ExecutionOutcome::new(
            ProcessExit::Error("killed".to_string()),
            PlatformKind::Android,
        );
        assert_eq!(errored.kind(), OutcomeKind::Failure);
        assert_eq!(errored.exit_code(), None);
    }

    #[test]
    fn test_outcome_error() {
        let ok = ExecutionOutcome::new(ProcessExit::Code(0), PlatformKind::IOS);
        assert!(ok.error("sfdx").is_none());

        let missing = ExecutionOutcome::new(
            ProcessExit::Code(TOOL_NOT_INSTALLED_EXIT_CODE),
            PlatformKind::IOS,
        );
        assert!(matches!(
            missing.error("sfdx"),
            Some(Error::ToolNotInstalled { executable }) if executable == "sfdx"
        ));

        let failed = ExecutionOutcome::new(ProcessExit::Code(3), PlatformKind::Android);
        assert_eq!(
            failed.error("sfdx").map(|e| e.to_string()).as_deref(),
            Some("Android preview failed: exit code 3")
        );
    }
}
