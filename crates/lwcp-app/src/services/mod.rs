//! Collaborator interfaces consumed by the preview pipeline
//!
//! Each external concern (prompting, notifications, persistence, telemetry,
//! module lookup, the dev server) is a trait injected into
//! [`crate::PreviewOrchestrator`] at construction. Synchronous collaborators
//! are shared as `Arc<dyn Trait>`; the async ones (`Prompter`, `DevServer`)
//! are generic parameters.

pub mod dev_server;
pub mod module_resolver;
pub mod prompter;
pub mod state_store;
pub mod telemetry;

use std::path::Path;
use std::time::Duration;

use url::Url;

use lwcp_core::prelude::*;
use lwcp_core::PlatformOption;

pub use dev_server::SystemBrowser;
pub use module_resolver::SfdxModuleResolver;
pub use prompter::{CancelPrompter, PresetPrompter};
pub use state_store::{MemoryStore, StateStore, StoreScope};
pub use telemetry::TracingTelemetry;

/// Informational, warning and error messages shown to the user
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Persistent output log the tool's output is streamed into
#[cfg_attr(test, mockall::automock)]
pub trait OutputLog: Send + Sync {
    fn append_line(&self, line: &str);

    /// Bring the log to the user's attention
    fn reveal(&self);
}

/// Usage and failure telemetry
#[cfg_attr(test, mockall::automock)]
pub trait Telemetry: Send + Sync {
    fn send_command_event(&self, log_name: &str, duration: Duration);
    fn send_exception(&self, log_name: &str, message: &str);
}

/// Maps filesystem paths to component module names (e.g. `c/foo`)
#[cfg_attr(test, mockall::automock)]
pub trait ModuleResolver: Send + Sync {
    fn module_from_file(&self, path: &Path) -> Option<String>;
    fn module_from_directory(&self, path: &Path) -> Option<String>;
}

/// String key/value store that survives across invocations
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Interactive prompts. `Ok(None)` means the user cancelled; `Err` means the
/// prompt itself could not be shown.
#[trait_variant::make(Prompter: Send)]
pub trait LocalPrompter {
    /// Choose one of `options`; returns its index
    async fn pick(&self, placeholder: &str, options: &[PlatformOption]) -> Result<Option<usize>>;

    /// Free-text input. An empty string is a submission, not a cancellation.
    async fn input(&self, placeholder: &str) -> Result<Option<String>>;
}

/// Local development server used by desktop previews
#[trait_variant::make(DevServer: Send)]
pub trait LocalDevServer {
    async fn is_running(&self) -> bool;

    /// Start the server and wait until it is ready
    async fn start(&self) -> Result<()>;

    /// Browser URL previewing `component`
    fn preview_url(&self, component: &str) -> Result<Url>;
}

/// Opens URLs in a browser
#[cfg_attr(test, mockall::automock)]
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &Url) -> Result<()>;
}
