//! # lwcp-app - Preview Pipeline
//!
//! Orchestrates one preview: resolves the component from a path, asks for a
//! platform and device, builds the tool invocation, launches it and reports
//! the outcome. Desktop previews go through the local dev server and the
//! system browser instead.
//!
//! ## Public API
//!
//! ### Pipeline
//! - [`PreviewOrchestrator`], [`Collaborators`], [`PreviewStatus`]
//! - [`target::resolve()`] - Path → component identifier
//! - [`PlatformSelector`] - Two-step platform/device prompt flow
//! - [`build_arguments()`] - Tool argument list
//! - [`Launcher`], [`LaunchHandle`] - Tool launch with one-shot completion
//! - [`ResultReporter`] - Notifications and telemetry for an outcome
//!
//! ### Collaborators (`services`)
//! - [`Prompter`], [`Notifier`], [`OutputLog`], [`Telemetry`],
//!   [`KeyValueStore`], [`ModuleResolver`], [`DevServer`], [`BrowserOpener`]
//!
//! ### Configuration (`config`)
//! - [`Settings`], [`load_settings()`], [`init_config_dir()`]

pub mod command;
pub mod config;
pub mod device_memory;
pub mod launch;
pub mod orchestrator;
pub mod reporter;
pub mod selector;
pub mod services;
pub mod target;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use command::build_arguments;
pub use config::{
    find_project_root, init_config_dir, load_settings, CliContract, ContractKind, Settings,
};
pub use device_memory::DeviceMemory;
pub use launch::{LaunchHandle, Launcher, RECENT_OUTPUT_LINES};
pub use orchestrator::{Collaborators, PreviewOrchestrator, PreviewStatus};
pub use reporter::{ResultReporter, LOG_NAME};
pub use selector::{PlatformSelector, Selection};
pub use services::{
    BrowserOpener, CancelPrompter, DevServer, KeyValueStore, LocalDevServer, LocalPrompter,
    MemoryStore, ModuleResolver, Notifier, OutputLog, PresetPrompter, Prompter, SfdxModuleResolver,
    StateStore, StoreScope, SystemBrowser, Telemetry, TracingTelemetry,
};
pub use target::ResolveFailure;
