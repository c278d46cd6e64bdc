//! # lwcp-launcher - CLI Tool Process Management
//!
//! Manages the external CLI tool: spawning preview invocations as child
//! processes, parsing the JSON status envelope it prints, resolving the
//! executable on `PATH`, running the local development server, and opening
//! preview URLs in the browser.
//!
//! Depends on [`lwcp_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Process Management
//! - [`ToolCommand`] - Program, arguments and environment of one invocation
//! - [`ToolProcess`] - A running child process streaming [`lwcp_core::ToolEvent`]s
//!
//! ### Protocol Parsing
//! - [`EnvelopeParser`] - Line-by-line collector for the JSON status envelope
//! - [`ToolResponse`] - Parsed envelope
//!
//! ### Dev Server & Browser
//! - [`DevServerProcess`] - Liveness probe and detached start of the dev server
//! - [`preview_route()`] - `/lwc/preview/<component>` route builder
//! - [`open_browser()`] - Open a URL in the system browser
//!
//! ### Tool Discovery
//! - [`ToolAvailability`] - Resolve the executable on `PATH`

pub mod browser;
pub mod dev_server;
pub mod process;
pub mod protocol;
pub mod tool_availability;

pub use browser::open_browser;
pub use dev_server::{
    preview_route, DevServerProcess, DEFAULT_DEV_SERVER_URL, DEV_SERVER_PREVIEW_ROUTE,
    DEV_SERVER_START_ACTION,
};
pub use process::{ToolCommand, ToolProcess};
pub use protocol::{parse_tool_response, EnvelopeParser, ToolResponse};
pub use tool_availability::ToolAvailability;

/// Environment variable that makes the tool print its JSON envelope on stdout
pub const JSON_TO_STDOUT_ENV: &str = "SFDX_JSON_TO_STDOUT";

/// Subcommand that launches a mobile preview
pub const PREVIEW_ACTION: &str = "force:lightning:lwc:preview";
