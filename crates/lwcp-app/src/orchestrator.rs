//! End-to-end preview pipeline
//!
//! Target resolution → platform/device selection → command building →
//! launch → reporting. Desktop previews replace the last three steps with
//! the dev server gate and a browser open. Every failure is reported here;
//! nothing escapes [`PreviewOrchestrator::execute`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use lwcp_core::prelude::*;
use lwcp_core::{
    platform_catalog, MessageKey, Messages, OutcomeKind, PlatformKind, PreviewRequest,
};

use crate::command::build_arguments;
use crate::config::{CliContract, Settings};
use crate::device_memory::DeviceMemory;
use crate::launch::Launcher;
use crate::reporter::{ResultReporter, LOG_NAME};
use crate::selector::{PlatformSelector, Selection};
use crate::services::{
    BrowserOpener, DevServer, KeyValueStore, ModuleResolver, Notifier, OutputLog, Prompter,
    Telemetry,
};
use crate::target;

/// How one invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    Succeeded,
    Cancelled,
    Failed,
}

impl PreviewStatus {
    /// Process exit status for the binary
    pub fn exit_code(&self) -> i32 {
        match self {
            PreviewStatus::Succeeded | PreviewStatus::Cancelled => 0,
            PreviewStatus::Failed => 1,
        }
    }
}

/// Everything the pipeline talks to
pub struct Collaborators<P, D> {
    pub prompter: P,
    pub dev_server: D,
    pub browser: Arc<dyn BrowserOpener>,
    pub resolver: Arc<dyn ModuleResolver>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub output: Arc<dyn OutputLog>,
    pub telemetry: Arc<dyn Telemetry>,
}

pub struct PreviewOrchestrator<P, D> {
    prompter: P,
    dev_server: D,
    browser: Arc<dyn BrowserOpener>,
    resolver: Arc<dyn ModuleResolver>,
    memory: DeviceMemory,
    notifier: Arc<dyn Notifier>,
    output: Arc<dyn OutputLog>,
    telemetry: Arc<dyn Telemetry>,
    messages: Arc<Messages>,
    launcher: Launcher,
    reporter: ResultReporter,
    contract: CliContract,
    log_level: String,
    remember_device: bool,
    include_desktop: bool,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<P: Prompter, D: DevServer> PreviewOrchestrator<P, D> {
    pub fn new(settings: &Settings, collaborators: Collaborators<P, D>) -> Self {
        let messages = Arc::new(Messages::with_overrides(settings.messages.iter()));
        let executable = settings.tool.executable.clone();

        let launcher = Launcher::new(
            executable.clone(),
            Arc::clone(&collaborators.output),
            Arc::clone(&messages),
        );
        let reporter = ResultReporter::new(
            Arc::clone(&collaborators.notifier),
            Arc::clone(&collaborators.output),
            Arc::clone(&collaborators.telemetry),
            Arc::clone(&messages),
            executable,
        );

        Self {
            prompter: collaborators.prompter,
            dev_server: collaborators.dev_server,
            browser: collaborators.browser,
            resolver: collaborators.resolver,
            memory: DeviceMemory::new(collaborators.store),
            notifier: collaborators.notifier,
            output: collaborators.output,
            telemetry: collaborators.telemetry,
            messages,
            launcher,
            reporter,
            contract: settings.contract(),
            log_level: settings.preview.log_level.clone(),
            remember_device: settings.preview.remember_device,
            include_desktop: settings.preview.include_desktop,
            shutdown: None,
        }
    }

    /// Kill a running tool when `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Working directory for the tool (the project root)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.launcher = self.launcher.with_current_dir(dir);
        self
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Run the pipeline for `source`. All errors are reported, never returned.
    pub async fn execute(&self, source: Option<&Path>) -> PreviewStatus {
        let started = Instant::now();
        match self.run(source, started).await {
            Ok(status) => status,
            Err(Error::SelectionCancelled { platform }) => {
                self.report_cancel(platform);
                PreviewStatus::Cancelled
            }
            Err(e) => {
                self.report_error(&e);
                PreviewStatus::Failed
            }
        }
    }

    async fn run(&self, source: Option<&Path>, started: Instant) -> Result<PreviewStatus> {
        let source = source.ok_or(Error::InputMissing)?;
        let component = target::resolve(&*self.resolver, source)?;
        info!("Previewing {} from {:?}", component, source);

        let catalog = platform_catalog(&self.messages, self.include_desktop);
        let selector = PlatformSelector::new(
            &self.prompter,
            &self.memory,
            &self.messages,
            self.remember_device,
        );

        let selection = selector.select(&catalog).await?;

        if selection.platform.id.is_desktop() {
            return Ok(self.preview_desktop(&component, started).await);
        }
        self.preview_mobile(source, selection, component, started)
            .await
    }

    async fn preview_mobile(
        &self,
        source: &Path,
        selection: Selection,
        component: String,
        started: Instant,
    ) -> Result<PreviewStatus> {
        let request = PreviewRequest::new(source, selection.platform, selection.target, component)?;
        let args = build_arguments(&request, &self.contract, &self.log_level);

        let platform = request.platform();
        let handle = self.launcher.launch(args, platform.id);
        let command_line = handle.command_line().to_string();

        let outcome = match &self.shutdown {
            Some(shutdown) => handle.outcome_or_shutdown(shutdown.clone()).await,
            None => handle.outcome().await,
        };

        let kind = self.reporter.report(
            &outcome,
            platform,
            request.resolved_target(),
            &command_line,
            started.elapsed(),
        );
        Ok(match kind {
            OutcomeKind::Success => PreviewStatus::Succeeded,
            OutcomeKind::Failure | OutcomeKind::ToolNotInstalled => PreviewStatus::Failed,
        })
    }

    async fn preview_desktop(&self, component: &str, started: Instant) -> PreviewStatus {
        let url = match self.dev_server.preview_url(component) {
            Ok(url) => url,
            Err(e) => return self.desktop_failed(&e),
        };

        if !self.dev_server.is_running().await {
            let origin = url.origin().ascii_serialization();
            self.notifier
                .info(&self.messages.localize(MessageKey::ServerStarting, &[origin.as_str()]));
            if let Err(e) = self.dev_server.start().await {
                return self.desktop_failed(&e);
            }
        }

        match self.browser.open(&url) {
            Ok(()) => {
                self.notifier.info(
                    &self
                        .messages
                        .localize(MessageKey::DesktopStart, &[url.as_str()]),
                );
                self.telemetry.send_command_event(LOG_NAME, started.elapsed());
                PreviewStatus::Succeeded
            }
            Err(e) => self.desktop_failed(&e),
        }
    }

    fn desktop_failed(&self, error: &Error) -> PreviewStatus {
        warn!("Desktop preview failed: {}", error);
        let detail = error.to_string();
        self.output.append_line(
            &self
                .messages
                .localize(MessageKey::GenericFailure, &[detail.as_str()]),
        );
        let message = self.messages.localize(MessageKey::DesktopFailure, &[]);
        self.notifier.error(&message);
        self.output.reveal();
        self.telemetry
            .send_exception(LOG_NAME, &format!("{} ({})", message, detail));
        PreviewStatus::Failed
    }

    /// `platform` is the platform whose device prompt was dismissed, if any
    fn report_cancel(&self, platform: Option<PlatformKind>) {
        match platform {
            None => {
                self.notifier
                    .info(&self.messages.localize(MessageKey::PlatformCancelled, &[]));
            }
            Some(platform) => {
                self.notifier
                    .warn(&self.messages.localize(MessageKey::DeviceCancelled, &[]));
                if let Some(key) = platform.cancelled_key() {
                    self.output.append_line(&self.messages.localize(key, &[]));
                }
            }
        }
    }

    fn report_error(&self, error: &Error) {
        let message = match error {
            Error::InputMissing => self.messages.localize(MessageKey::FileUndefined, &[]),
            Error::PathNotFound { path } => {
                let path = path.display().to_string();
                self.messages
                    .localize(MessageKey::FileNonexist, &[path.as_str()])
            }
            Error::UnsupportedComponent { path } => {
                let path = path.display().to_string();
                self.messages
                    .localize(MessageKey::Unsupported, &[path.as_str()])
            }
            other => {
                let detail = other.to_string();
                self.messages
                    .localize(MessageKey::GenericFailure, &[detail.as_str()])
            }
        };

        error!("Preview failed: {}", error);
        self.notifier.error(&message);
        self.output.append_line(&format!("Error: {}", message));
        self.output.reveal();
        self.telemetry.send_exception(LOG_NAME, &message);
    }
}
