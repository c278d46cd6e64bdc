//! LWC Preview
//!
//! Launches a Lightning Web Component preview in the desktop browser, an iOS
//! simulator or an Android emulator through the Salesforce CLI.

pub mod console;
pub mod headless;
pub mod runner;
pub mod signals;

pub use runner::{run, RunOptions, ACTIVE_FILE_ENV};
