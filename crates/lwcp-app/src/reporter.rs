//! Turns execution outcomes into notifications and telemetry

use std::sync::Arc;
use std::time::Duration;

use lwcp_core::prelude::*;
use lwcp_core::{ExecutionOutcome, MessageKey, Messages, OutcomeKind, PlatformOption};

use crate::services::{Notifier, OutputLog, Telemetry};

/// Telemetry name for the preview command
pub const LOG_NAME: &str = "lwc_preview";

pub struct ResultReporter {
    notifier: Arc<dyn Notifier>,
    output: Arc<dyn OutputLog>,
    telemetry: Arc<dyn Telemetry>,
    messages: Arc<Messages>,
    executable: String,
}

impl ResultReporter {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        output: Arc<dyn OutputLog>,
        telemetry: Arc<dyn Telemetry>,
        messages: Arc<Messages>,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            output,
            telemetry,
            messages,
            executable: executable.into(),
        }
    }

    /// Report one mobile preview outcome. Returns the interpreted kind.
    pub fn report(
        &self,
        outcome: &ExecutionOutcome,
        platform: &PlatformOption,
        target: &str,
        command_line: &str,
        elapsed: Duration,
    ) -> OutcomeKind {
        let kind = outcome.kind();
        match kind {
            OutcomeKind::Success => {
                self.notifier
                    .info(&self.messages.localize(platform.id.start_key(), &[target]));
                self.notifier.info(
                    &self
                        .messages
                        .localize(MessageKey::ExecutionSuccess, &[command_line]),
                );
                self.telemetry.send_command_event(LOG_NAME, elapsed);
            }
            OutcomeKind::Failure | OutcomeKind::ToolNotInstalled => {
                if let Some(detail) = &outcome.diagnostics {
                    self.output.append_line(
                        &self
                            .messages
                            .localize(MessageKey::ToolErrorDetail, &[detail.as_str()]),
                    );
                }
                if kind == OutcomeKind::ToolNotInstalled {
                    self.output.append_line(
                        &self
                            .messages
                            .localize(MessageKey::InstallInstructions, &[self.executable.as_str()]),
                    );
                }

                let message = self.messages.localize(platform.id.failure_key(), &[target]);
                self.notifier.error(&message);
                self.output.reveal();

                let detail = outcome
                    .error(&self.executable)
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                warn!("{}", detail);
                self.telemetry
                    .send_exception(LOG_NAME, &format!("{} ({})", message, detail));
            }
        }
        kind
    }
}
