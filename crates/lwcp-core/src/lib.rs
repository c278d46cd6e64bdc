//! # lwcp-core - Core Domain Types
//!
//! Foundation crate for the LWC preview launcher. Provides domain types, error
//! handling, the user-facing message catalog, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`PlatformKind`] - Desktop, iOS or Android
//! - [`PlatformOption`], [`platform_catalog()`] - The ordered platform picker entries
//! - [`PreviewRequest`] - A fully resolved request handed to the command builder
//! - [`ExecutionOutcome`], [`OutcomeKind`] - Interpreted result of a tool run
//!
//! ### Events (`events`)
//! - [`ToolEvent`] - stdout/stderr/exit events from a running tool process
//!
//! ### Messages (`messages`)
//! - [`MessageKey`] - Stable identifiers for every user-facing string
//! - [`Messages`] - Template table with per-key overrides
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum covering resolution, selection, launch and terminal failures
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! ```rust
//! use lwcp_core::prelude::*;
//! ```

pub mod ansi;
pub mod error;
pub mod events;
pub mod logging;
pub mod messages;
pub mod types;

/// Prelude for common imports used throughout all lwcp crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use ansi::strip_ansi_codes;
pub use error::{Error, Result};
pub use events::ToolEvent;
pub use messages::{format_template, MessageKey, Messages};
pub use types::{
    platform_catalog, ExecutionOutcome, OutcomeKind, PlatformKind, PlatformOption,
    PreviewRequest, ProcessExit, TOOL_NOT_INSTALLED_EXIT_CODE,
};
