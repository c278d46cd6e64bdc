//! Telemetry sink that records events in the application log

use std::time::Duration;

use lwcp_core::prelude::*;

use super::Telemetry;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn send_command_event(&self, log_name: &str, duration: Duration) {
        info!(
            target: "lwcp_telemetry",
            command = log_name,
            duration_ms = duration.as_millis() as u64,
            "command completed"
        );
    }

    fn send_exception(&self, log_name: &str, message: &str) {
        warn!(
            target: "lwcp_telemetry",
            command = log_name,
            "exception: {}",
            message
        );
    }
}
