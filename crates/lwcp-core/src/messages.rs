//! User-facing message catalog
//!
//! Every string shown to the user is addressed by a [`MessageKey`] with a
//! stable identifier. Templates use positional `{0}`, `{1}` placeholders so a
//! translated table may reorder arguments. Overrides are keyed by the stable
//! identifier and typically come from the `[messages]` table in config.

use std::collections::HashMap;

use tracing::warn;

/// Stable identifiers for every user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // Shared
    PreviewText,
    PlatformSelection,
    FileUndefined,
    FileNonexist,
    Unsupported,
    GenericFailure,
    PlatformCancelled,
    DeviceCancelled,
    ExecutionSuccess,
    ToolNotInstalled,
    InstallInstructions,
    ToolErrorDetail,
    ServerStarting,

    // Desktop
    DesktopLabel,
    DesktopDescription,
    DesktopStart,
    DesktopFailure,

    // iOS
    IosLabel,
    IosDescription,
    IosTargetDefault,
    IosTargetRemembered,
    IosCancelled,
    IosFailure,
    IosStart,

    // Android
    AndroidLabel,
    AndroidDescription,
    AndroidTargetDefault,
    AndroidTargetRemembered,
    AndroidCancelled,
    AndroidFailure,
    AndroidStart,
}

impl MessageKey {
    pub const ALL: &'static [MessageKey] = &[
        MessageKey::PreviewText,
        MessageKey::PlatformSelection,
        MessageKey::FileUndefined,
        MessageKey::FileNonexist,
        MessageKey::Unsupported,
        MessageKey::GenericFailure,
        MessageKey::PlatformCancelled,
        MessageKey::DeviceCancelled,
        MessageKey::ExecutionSuccess,
        MessageKey::ToolNotInstalled,
        MessageKey::InstallInstructions,
        MessageKey::ToolErrorDetail,
        MessageKey::ServerStarting,
        MessageKey::DesktopLabel,
        MessageKey::DesktopDescription,
        MessageKey::DesktopStart,
        MessageKey::DesktopFailure,
        MessageKey::IosLabel,
        MessageKey::IosDescription,
        MessageKey::IosTargetDefault,
        MessageKey::IosTargetRemembered,
        MessageKey::IosCancelled,
        MessageKey::IosFailure,
        MessageKey::IosStart,
        MessageKey::AndroidLabel,
        MessageKey::AndroidDescription,
        MessageKey::AndroidTargetDefault,
        MessageKey::AndroidTargetRemembered,
        MessageKey::AndroidCancelled,
        MessageKey::AndroidFailure,
        MessageKey::AndroidStart,
    ];

    /// Stable identifier used by translation tables
    pub fn id(&self) -> &'static str {
        match self {
            MessageKey::PreviewText => "preview_text",
            MessageKey::PlatformSelection => "preview_platform_selection",
            MessageKey::FileUndefined => "preview_file_undefined",
            MessageKey::FileNonexist => "preview_file_nonexist",
            MessageKey::Unsupported => "preview_unsupported",
            MessageKey::GenericFailure => "preview_generic_failure",
            MessageKey::PlatformCancelled => "preview_platform_cancelled",
            MessageKey::DeviceCancelled => "preview_device_cancelled",
            MessageKey::ExecutionSuccess => "preview_execution_success",
            MessageKey::ToolNotInstalled => "preview_tool_not_installed",
            MessageKey::InstallInstructions => "preview_install_instructions",
            MessageKey::ToolErrorDetail => "preview_tool_error_detail",
            MessageKey::ServerStarting => "preview_server_starting",
            MessageKey::DesktopLabel => "preview_desktop_label",
            MessageKey::DesktopDescription => "preview_desktop_description",
            MessageKey::DesktopStart => "preview_desktop_start",
            MessageKey::DesktopFailure => "preview_desktop_failure",
            MessageKey::IosLabel => "preview_ios_label",
            MessageKey::IosDescription => "preview_ios_description",
            MessageKey::IosTargetDefault => "preview_ios_target_default",
            MessageKey::IosTargetRemembered => "preview_ios_target_remembered",
            MessageKey::IosCancelled => "preview_ios_cancelled",
            MessageKey::IosFailure => "preview_ios_failure",
            MessageKey::IosStart => "preview_ios_start",
            MessageKey::AndroidLabel => "preview_android_label",
            MessageKey::AndroidDescription => "preview_android_description",
            MessageKey::AndroidTargetDefault => "preview_android_target_default",
            MessageKey::AndroidTargetRemembered => "preview_android_target_remembered",
            MessageKey::AndroidCancelled => "preview_android_cancelled",
            MessageKey::AndroidFailure => "preview_android_failure",
            MessageKey::AndroidStart => "preview_android_start",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.id() == id)
    }

    /// Built-in English template
    pub fn default_template(&self) -> &'static str {
        match self {
            MessageKey::PreviewText => "Preview Lightning Web Component",
            MessageKey::PlatformSelection => "Select a platform to preview the component on",
            MessageKey::FileUndefined => {
                "Can't preview: no file or directory was given and no document is active."
            }
            MessageKey::FileNonexist => "Can't preview: {0} does not exist.",
            MessageKey::Unsupported => {
                "Can't preview {0}: it is not inside a Lightning Web Component bundle."
            }
            MessageKey::GenericFailure => "Something went wrong while previewing: {0}",
            MessageKey::PlatformCancelled => "No platform selected. Preview cancelled.",
            MessageKey::DeviceCancelled => "No device selected. Preview cancelled.",
            MessageKey::ExecutionSuccess => "Successfully executed: {0}",
            MessageKey::ToolNotInstalled => "The external preview tool is not installed.",
            MessageKey::InstallInstructions => {
                "Install the mobile preview plugin and try again: {0} plugins:install @salesforce/lwc-dev-mobile"
            }
            MessageKey::ToolErrorDetail => "Error reported by the preview tool: {0}",
            MessageKey::ServerStarting => "Starting the local development server at {0}...",
            MessageKey::DesktopLabel => "Use Desktop Browser",
            MessageKey::DesktopDescription => "Preview the component in your desktop browser",
            MessageKey::DesktopStart => "Opening {0} in the desktop browser",
            MessageKey::DesktopFailure => "Failed to open the preview in the desktop browser.",
            MessageKey::IosLabel => "Use iOS Simulator",
            MessageKey::IosDescription => "Preview the component on an iOS simulator",
            MessageKey::IosTargetDefault => {
                "Enter a name for a new simulator or an existing one, or leave blank for the default (SFDXSimulator)"
            }
            MessageKey::IosTargetRemembered => {
                "Enter a name for a new simulator or an existing one, or leave blank to use {0}"
            }
            MessageKey::IosCancelled => "iOS preview cancelled before a simulator was chosen.",
            MessageKey::IosFailure => "Failed to start the iOS preview on simulator '{0}'.",
            MessageKey::IosStart => "Starting iOS simulator '{0}'...",
            MessageKey::AndroidLabel => "Use Android Emulator",
            MessageKey::AndroidDescription => "Preview the component on an Android emulator",
            MessageKey::AndroidTargetDefault => {
                "Enter a name for a new emulator or an existing one, or leave blank for the default (SFDXEmulator)"
            }
            MessageKey::AndroidTargetRemembered => {
                "Enter a name for a new emulator or an existing one, or leave blank to use {0}"
            }
            MessageKey::AndroidCancelled => {
                "Android preview cancelled before an emulator was chosen."
            }
            MessageKey::AndroidFailure => "Failed to start the Android preview on emulator '{0}'.",
            MessageKey::AndroidStart => "Starting Android emulator '{0}'...",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Message table: built-in templates plus optional per-key overrides
#[derive(Debug, Clone, Default)]
pub struct Messages {
    overrides: HashMap<MessageKey, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with overrides keyed by stable identifier.
    ///
    /// Unknown identifiers are skipped with a warning.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = HashMap::new();
        for (id, template) in overrides {
            match MessageKey::from_id(id.as_ref()) {
                Some(key) => {
                    table.insert(key, template.into());
                }
                None => warn!("Ignoring override for unknown message key '{}'", id.as_ref()),
            }
        }
        Self { overrides: table }
    }

    pub fn template(&self, key: MessageKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_template())
    }

    /// Render a message, substituting `{N}` with `args[N]`
    pub fn localize(&self, key: MessageKey, args: &[&str]) -> String {
        format_template(self.template(key), args)
    }
}

/// Substitute positional `{N}` placeholders. Placeholders with no matching
/// argument are left untouched.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
