//! # lwcp-tui - Terminal Prompts
//!
//! Ratatui modals for the two interactive steps of a preview: choosing a
//! platform and naming a device. [`TuiPrompter`] adapts them to the
//! [`lwcp_app::Prompter`] trait.

pub mod input;
pub mod picker;
pub mod prompter;
mod widgets;

pub use input::{read_input, InputResult};
pub use picker::{pick_platform, PickResult};
pub use prompter::TuiPrompter;
