//! Tool process management

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

use lwcp_core::prelude::*;
use lwcp_core::ToolEvent;

/// A fully described tool invocation: program, arguments, extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(String, String)] {
        &self.envs
    }

    /// Human-readable command line, used in logs and the success acknowledgment.
    ///
    /// The program is shown by file stem (`sfdx`, not `/usr/local/bin/sfdx.cmd`).
    pub fn command_line(&self) -> String {
        let program = self
            .program
            .file_stem()
            .unwrap_or_else(|| self.program.as_os_str())
            .to_string_lossy()
            .into_owned();

        std::iter::once(program)
            .chain(self.args.iter().map(|arg| quote_arg(arg)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Manages a running tool child process.
///
/// The `Child` handle is moved into a dedicated `wait_for_exit` background task
/// that emits `ToolEvent::Exited` with the real exit code. Dropping a
/// `ToolProcess` detaches from the child; it keeps running until it exits or
/// the runtime shuts down. Use [`ToolProcess::kill`] to stop it early.
pub struct ToolProcess {
    /// Process ID for logging
    pid: Option<u32>,
    /// One-shot sender that tells the wait task to force-kill the process.
    kill_tx: Option<oneshot::Sender<()>>,
    /// Set to `true` by the wait task once the child has exited.
    exited: Arc<AtomicBool>,
}

impl ToolProcess {
    /// Spawn the tool. Output and exit are delivered on `event_tx`.
    pub fn spawn(command: &ToolCommand, event_tx: mpsc::Sender<ToolEvent>) -> Result<Self> {
        info!("Spawning tool: {}", command.command_line());

        let mut cmd = Command::new(command.program());
        cmd.args(command.get_args())
            .envs(
                command
                    .get_envs()
                    .iter()
                    .map(|(k, v)| (OsStr::new(k), OsStr::new(v))),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(command.program().display().to_string())
            } else {
                Error::ProcessSpawn {
                    reason: e.to_string(),
                }
            }
        })?;

        let pid = child.id();
        info!("Tool process started with PID: {:?}", pid);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ProcessSpawn {
                reason: "stdout was not captured".to_string(),
            })?;
        tokio::spawn(Self::read_lines(
            stdout,
            event_tx.clone(),
            |line| ToolEvent::Stdout { line },
            "stdout",
        ));

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ProcessSpawn {
                reason: "stderr was not captured".to_string(),
            })?;
        tokio::spawn(Self::read_lines(
            stderr,
            event_tx.clone(),
            |line| ToolEvent::Stderr { line },
            "stderr",
        ));

        let exited = Arc::new(AtomicBool::new(false));
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        tokio::spawn(Self::wait_for_exit(
            child,
            kill_rx,
            event_tx,
            Arc::clone(&exited),
        ));

        Ok(Self {
            pid,
            kill_tx: Some(kill_tx),
            exited,
        })
    }

    /// Background task: owns `child`, waits for it to exit, emits `ToolEvent::Exited`.
    ///
    /// Only an explicit kill request ends the child early. A dropped kill
    /// sender does not match the `Ok(())` arm, so detaching never kills.
    async fn wait_for_exit(
        mut child: Child,
        kill_rx: oneshot::Receiver<()>,
        event_tx: mpsc::Sender<ToolEvent>,
        exited: Arc<AtomicBool>,
    ) {
        let wait_result = tokio::select! {
            result = child.wait() => result,
            Ok(()) = kill_rx => {
                info!("Kill signal received, terminating tool process");
                if let Err(e) = child.kill().await {
                    error!("Failed to kill tool process: {}", e);
                }
                child.wait().await
            }
        };

        let code = match wait_result {
            Ok(status) => {
                info!("Tool process exited with status: {:?}", status);
                status.code()
            }
            Err(e) => {
                error!("Error waiting for tool process: {}", e);
                None
            }
        };

        // Mark exited before sending so `has_exited()` is true when callers see the event.
        exited.store(true, Ordering::Release);

        debug!("Sending ToolEvent::Exited {{ code: {:?} }}", code);
        let _ = event_tx.send(ToolEvent::Exited { code }).await;
    }

    /// Forward one output stream line by line until EOF or a read error.
    ///
    /// Lines are split on raw `\n` and decoded lossily; invalid UTF-8 never
    /// ends the stream.
    async fn read_lines<R>(
        stream: R,
        tx: mpsc::Sender<ToolEvent>,
        to_event: fn(String) -> ToolEvent,
        name: &'static str,
    ) where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = decode_line(&buf);
                    trace!("{}: {}", name, line);

                    if tx.send(to_event(line)).await.is_err() {
                        debug!("{} channel closed", name);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read tool {}: {}", name, e);
                    break;
                }
            }
        }

        debug!("{} reader finished", name);
    }

    /// Ask the wait task to kill the child. No-op after the first call or
    /// once the process has exited.
    pub fn kill(&mut self) {
        if self.has_exited() {
            return;
        }
        if let Some(tx) = self.kill_tx.take() {
            warn!("Killing tool process {:?}", self.pid);
            let _ = tx.send(());
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }
}

/// Strip the line terminator and decode, replacing invalid UTF-8
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
