//! Headless mode - NDJSON event output
//!
//! With `--headless` nothing is prompted and every notification, output line
//! and telemetry record is written to stdout as one JSON object per line:
//!
//! ```json
//! {"event":"started","source":"force-app/main/default/lwc/hello","timestamp":1704700001000}
//! {"event":"notice","level":"info","message":"Opening hello in the browser","timestamp":1704700002000}
//! {"event":"finished","status":"succeeded","exit_code":0,"timestamp":1704700003000}
//! ```

use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use lwcp_app::{Notifier, OutputLog, PreviewStatus, Telemetry};
use lwcp_core::prelude::*;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Pipeline starting for a source path
    Started {
        source: Option<String>,
        project: String,
        timestamp: i64,
    },

    /// User-facing notification
    Notice {
        level: String,
        message: String,
        timestamp: i64,
    },

    /// Line from the tool's output
    Output { line: String, timestamp: i64 },

    /// The output log would be brought to the front
    OutputRevealed { timestamp: i64 },

    /// Telemetry record
    Telemetry {
        name: String,
        duration_ms: Option<u64>,
        error: Option<String>,
        timestamp: i64,
    },

    /// Pipeline finished
    Finished {
        status: String,
        exit_code: i32,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn started(source: Option<&str>, project: &str) -> Self {
        Self::Started {
            source: source.map(str::to_string),
            project: project.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn notice(level: &str, message: &str) -> Self {
        Self::Notice {
            level: level.to_string(),
            message: message.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn output(line: &str) -> Self {
        Self::Output {
            line: line.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn output_revealed() -> Self {
        Self::OutputRevealed {
            timestamp: Self::now(),
        }
    }

    pub fn command(name: &str, duration: Duration) -> Self {
        Self::Telemetry {
            name: name.to_string(),
            duration_ms: Some(duration.as_millis() as u64),
            error: None,
            timestamp: Self::now(),
        }
    }

    pub fn exception(name: &str, message: &str) -> Self {
        Self::Telemetry {
            name: name.to_string(),
            duration_ms: None,
            error: Some(message.to_string()),
            timestamp: Self::now(),
        }
    }

    pub fn finished(status: PreviewStatus) -> Self {
        let label = match status {
            PreviewStatus::Succeeded => "succeeded",
            PreviewStatus::Cancelled => "cancelled",
            PreviewStatus::Failed => "failed",
        };
        Self::Finished {
            status: label.to_string(),
            exit_code: status.exit_code(),
            timestamp: Self::now(),
        }
    }
}

/// Notifier, output log and telemetry sink that all emit [`HeadlessEvent`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessSink;

impl Notifier for HeadlessSink {
    fn info(&self, message: &str) {
        HeadlessEvent::notice("info", message).emit();
    }

    fn warn(&self, message: &str) {
        HeadlessEvent::notice("warn", message).emit();
    }

    fn error(&self, message: &str) {
        HeadlessEvent::notice("error", message).emit();
    }
}

impl OutputLog for HeadlessSink {
    fn append_line(&self, line: &str) {
        HeadlessEvent::output(line).emit();
    }

    fn reveal(&self) {
        HeadlessEvent::output_revealed().emit();
    }
}

impl Telemetry for HeadlessSink {
    fn send_command_event(&self, log_name: &str, duration: Duration) {
        HeadlessEvent::command(log_name, duration).emit();
    }

    fn send_exception(&self, log_name: &str, message: &str) {
        HeadlessEvent::exception(log_name, message).emit();
    }
}
