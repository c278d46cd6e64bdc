//! Tool launch and outcome interpretation
//!
//! [`Launcher::launch`] resolves the tool on `PATH`, spawns it and returns a
//! [`LaunchHandle`] straight away. A monitor task forwards each output line
//! (ANSI-stripped) to the [`OutputLog`] as it arrives, watches stdout for the
//! tool's JSON status envelope, and resolves the handle's completion channel
//! exactly once with an [`ExecutionOutcome`].

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use lwcp_core::prelude::*;
use lwcp_core::{
    strip_ansi_codes, ExecutionOutcome, MessageKey, Messages, OutcomeKind, PlatformKind,
    ProcessExit, ToolEvent, TOOL_NOT_INSTALLED_EXIT_CODE,
};
use lwcp_launcher::{
    EnvelopeParser, ToolAvailability, ToolCommand, ToolProcess, JSON_TO_STDOUT_ENV,
};

use crate::services::OutputLog;

/// Output lines kept for failure reports
pub const RECENT_OUTPUT_LINES: usize = 50;

/// How long to keep reading output after the exit status arrives
const DRAIN_TIMEOUT: Duration = Duration::from_millis(200);

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Starts tool invocations
pub struct Launcher {
    executable: String,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
    output: Arc<dyn OutputLog>,
    messages: Arc<Messages>,
}

impl Launcher {
    pub fn new(
        executable: impl Into<String>,
        output: Arc<dyn OutputLog>,
        messages: Arc<Messages>,
    ) -> Self {
        Self {
            executable: executable.into(),
            envs: vec![(JSON_TO_STDOUT_ENV.to_string(), "true".to_string())],
            current_dir: None,
            output,
            messages,
        }
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn command(&self, program: PathBuf, args: Vec<String>) -> ToolCommand {
        let mut command = ToolCommand::new(program).args(args);
        for (key, value) in &self.envs {
            command = command.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            command = command.current_dir(dir);
        }
        command
    }

    /// Start the tool with `args`. Must be called within a tokio runtime.
    pub fn launch(&self, args: Vec<String>, platform: PlatformKind) -> LaunchHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (kill_tx, kill_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let availability = ToolAvailability::check(&self.executable);
        let program = availability
            .resolved
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.executable));
        let command = self.command(program, args);
        let command_line = command.command_line();

        let process = if availability.is_available() {
            match ToolProcess::spawn(&command, event_tx.clone()) {
                Ok(process) => Some(process),
                Err(e) => {
                    queue_spawn_failure(&event_tx, &e);
                    None
                }
            }
        } else {
            warn!("{} not found on PATH", self.executable);
            queue_spawn_failure(&event_tx, &Error::tool_not_found(&self.executable));
            None
        };
        // The monitor sees the channel close once the process side is done.
        drop(event_tx);

        tokio::spawn(monitor(
            process,
            event_rx,
            kill_rx,
            Arc::clone(&self.output),
            Arc::clone(&self.messages),
            platform,
            done_tx,
        ));

        LaunchHandle {
            command_line,
            platform,
            completion: done_rx,
            kill_tx: Some(kill_tx),
        }
    }
}

/// A missing executable reads as the shell's "command not found" status.
fn queue_spawn_failure(event_tx: &mpsc::Sender<ToolEvent>, error: &Error) {
    let event = match error {
        Error::ToolNotFound { .. } => ToolEvent::Exited {
            code: Some(TOOL_NOT_INSTALLED_EXIT_CODE),
        },
        other => ToolEvent::SpawnFailed {
            reason: other.to_string(),
        },
    };
    if event_tx.try_send(event).is_err() {
        error!("Failed to queue spawn failure: {}", error);
    }
}

async fn monitor(
    mut process: Option<ToolProcess>,
    mut events: mpsc::Receiver<ToolEvent>,
    mut kill_rx: oneshot::Receiver<()>,
    output: Arc<dyn OutputLog>,
    messages: Arc<Messages>,
    platform: PlatformKind,
    done_tx: oneshot::Sender<ExecutionOutcome>,
) {
    let mut recent = VecDeque::with_capacity(RECENT_OUTPUT_LINES);
    let mut parser = EnvelopeParser::new();
    let mut diagnostics = None;
    let mut exit = None;
    let mut kill_armed = true;

    loop {
        let event = if exit.is_some() {
            // A device process started by the tool can hold the pipes open.
            match tokio::time::timeout(DRAIN_TIMEOUT, events.recv()).await {
                Ok(Some(event)) => event,
                _ => break,
            }
        } else {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                result = &mut kill_rx, if kill_armed => {
                    kill_armed = false;
                    if result.is_ok() {
                        if let Some(process) = process.as_mut() {
                            process.kill();
                        }
                    }
                    continue;
                }
            }
        };

        match event {
            ToolEvent::Stdout { line } => {
                let line = strip_ansi_codes(&line);
                if let Some(response) = parser.feed(&line) {
                    if let Some(message) = response.error_message() {
                        debug!("Tool reported error: {}", message);
                        diagnostics = Some(message);
                    }
                }
                forward_line(&*output, &mut recent, line);
            }
            ToolEvent::Stderr { line } => {
                forward_line(&*output, &mut recent, strip_ansi_codes(&line));
            }
            ToolEvent::SpawnFailed { reason } => {
                exit = Some(ProcessExit::Error(reason));
            }
            ToolEvent::Exited { code } => {
                exit = Some(match code {
                    Some(code) => ProcessExit::Code(code),
                    None => ProcessExit::Error("terminated by signal".to_string()),
                });
            }
        }
    }

    let exit = exit.unwrap_or_else(|| {
        ProcessExit::Error("tool output ended without an exit status".to_string())
    });
    let mut outcome = ExecutionOutcome::new(exit, platform);
    outcome.diagnostics = diagnostics;
    outcome.recent_output = recent.into_iter().collect();

    if outcome.kind() == OutcomeKind::ToolNotInstalled {
        output.append_line(&messages.localize(MessageKey::ToolNotInstalled, &[]));
    }

    info!("Tool finished: {:?}", outcome.exit);
    if done_tx.send(outcome).is_err() {
        debug!("Launch handle dropped before completion");
    }
}

fn forward_line(output: &dyn OutputLog, recent: &mut VecDeque<String>, line: String) {
    output.append_line(&line);
    if recent.len() == RECENT_OUTPUT_LINES {
        recent.pop_front();
    }
    recent.push_back(line);
}

/// A launched tool invocation. Completes exactly once.
#[derive(Debug)]
pub struct LaunchHandle {
    command_line: String,
    platform: PlatformKind,
    completion: oneshot::Receiver<ExecutionOutcome>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl LaunchHandle {
    /// The executed command line, program shown by name
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Kill the tool. The outcome still arrives, reporting the kill.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }

    pub async fn outcome(self) -> ExecutionOutcome {
        let platform = self.platform;
        self.completion
            .await
            .unwrap_or_else(|_| lost_outcome(platform))
    }

    /// Wait for the outcome, killing the tool if `shutdown` turns true first
    pub async fn outcome_or_shutdown(
        mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> ExecutionOutcome {
        if *shutdown.borrow() {
            self.cancel();
        }

        let mut watching = true;
        loop {
            tokio::select! {
                result = &mut self.completion => {
                    return result.unwrap_or_else(|_| lost_outcome(self.platform));
                }
                changed = shutdown.changed(), if watching => {
                    match changed {
                        Ok(()) => {
                            if *shutdown.borrow() {
                                info!("Shutdown requested, stopping tool");
                                if let Some(tx) = self.kill_tx.take() {
                                    let _ = tx.send(());
                                }
                                watching = false;
                            }
                        }
                        Err(_) => watching = false,
                    }
                }
            }
        }
    }
}

fn lost_outcome(platform: PlatformKind) -> ExecutionOutcome {
    ExecutionOutcome::new(
        ProcessExit::Error("launcher task ended unexpectedly".to_string()),
        platform,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingOutput;

    fn launcher(executable: &str, output: &Arc<RecordingOutput>) -> Launcher {
        Launcher::new(executable, output.clone(), Arc::new(Messages::new()))
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_installed() {
        let output = Arc::new(RecordingOutput::new());
        let handle = launcher("lwcp-no-such-tool", &output)
            .launch(vec!["force:lightning:lwc:preview".into()], PlatformKind::IOS);

        assert_eq!(
            handle.command_line(),
            "lwcp-no-such-tool force:lightning:lwc:preview"
        );
        let outcome = handle.outcome().await;
        assert_eq!(outcome.exit, ProcessExit::Code(127));
        assert_eq!(outcome.kind(), OutcomeKind::ToolNotInstalled);

        let not_installed = Messages::new().localize(MessageKey::ToolNotInstalled, &[]);
        let lines = output.lines();
        assert_eq!(lines.iter().filter(|l| **l == not_installed).count(), 1);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::test_utils::fake_tool;

        #[tokio::test]
        async fn test_success_forwards_clean_output() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(
                temp.path(),
                "printf '\\033[32mLaunching\\033[0m\\n'\necho \"json=$SFDX_JSON_TO_STDOUT\"\nexit 0",
            );
            let output = Arc::new(RecordingOutput::new());

            let outcome = launcher(tool.to_str().unwrap(), &output)
                .launch(vec![], PlatformKind::Android)
                .outcome()
                .await;

            assert!(outcome.is_success());
            assert_eq!(outcome.platform, PlatformKind::Android);
            assert_eq!(output.lines(), vec!["Launching", "json=true"]);
            assert_eq!(outcome.recent_output, vec!["Launching", "json=true"]);
        }

        #[tokio::test]
        async fn test_exit_127_appends_single_not_installed_line() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(temp.path(), "echo 'plugin missing' >&2\nexit 127");
            let output = Arc::new(RecordingOutput::new());

            let outcome = launcher(tool.to_str().unwrap(), &output)
                .launch(vec![], PlatformKind::IOS)
                .outcome()
                .await;

            assert_eq!(outcome.kind(), OutcomeKind::ToolNotInstalled);
            let not_installed = Messages::new().localize(MessageKey::ToolNotInstalled, &[]);
            let lines = output.lines();
            assert_eq!(lines.iter().filter(|l| **l == not_installed).count(), 1);
            assert_eq!(lines.first().map(String::as_str), Some("plugin missing"));
        }

        #[tokio::test]
        async fn test_failure_captures_envelope_and_tail() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(
                temp.path(),
                "i=0\nwhile [ $i -lt 60 ]; do echo \"line $i\"; i=$((i+1)); done\n\
                 echo '{'\necho '  \"status\": 1,'\necho '  \"name\": \"NoSim\",'\n\
                 echo '  \"message\": \"boot failed\"'\necho '}'\nexit 1",
            );
            let output = Arc::new(RecordingOutput::new());

            let outcome = launcher(tool.to_str().unwrap(), &output)
                .launch(vec![], PlatformKind::IOS)
                .outcome()
                .await;

            assert_eq!(outcome.kind(), OutcomeKind::Failure);
            assert_eq!(outcome.exit_code(), Some(1));
            assert_eq!(outcome.diagnostics.as_deref(), Some("NoSim: boot failed"));
            assert_eq!(outcome.recent_output.len(), RECENT_OUTPUT_LINES);
            assert_eq!(outcome.recent_output.last().map(String::as_str), Some("}"));
            assert_eq!(output.lines().len(), 65);
        }

        #[tokio::test]
        async fn test_arguments_reach_the_tool() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(temp.path(), "echo \"$@\"");
            let output = Arc::new(RecordingOutput::new());

            let outcome = launcher(tool.to_str().unwrap(), &output)
                .launch(
                    vec!["-p".into(), "iOS".into(), "-t".into(), "My Sim".into()],
                    PlatformKind::IOS,
                )
                .outcome()
                .await;

            assert!(outcome.is_success());
            assert_eq!(output.lines(), vec!["-p iOS -t My Sim"]);
        }

        #[tokio::test]
        async fn test_invalid_utf8_output_keeps_streaming() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(
                temp.path(),
                "echo before\nprintf 'bad \\377\\376 bytes\\n'\nsleep 0.2\necho after\nexit 0",
            );
            let output = Arc::new(RecordingOutput::new());

            let outcome = launcher(tool.to_str().unwrap(), &output)
                .launch(vec![], PlatformKind::Android)
                .outcome()
                .await;

            assert_eq!(outcome.exit, ProcessExit::Code(0));
            assert_eq!(outcome.kind(), OutcomeKind::Success);
            assert_eq!(
                output.lines(),
                vec!["before", "bad \u{FFFD}\u{FFFD} bytes", "after"]
            );
        }

        #[tokio::test]
        async fn test_shutdown_kills_tool() {
            let temp = tempfile::tempdir().unwrap();
            let tool = fake_tool(temp.path(), "echo started\nexec sleep 30");
            let output = Arc::new(RecordingOutput::new());
            let (shutdown_tx, shutdown_rx) = watch::channel(false);

            let handle = launcher(tool.to_str().unwrap(), &output)
                .launch(vec![], PlatformKind::Android);
            let waiter = tokio::spawn(handle.outcome_or_shutdown(shutdown_rx));

            tokio::time::sleep(Duration::from_millis(200)).await;
            shutdown_tx.send(true).unwrap();

            let outcome = tokio::time::timeout(Duration::from_secs(5), waiter)
                .await
                .expect("tool should be killed")
                .unwrap();
            assert!(!outcome.is_success());
        }
    }
}
