//! Local development server lifecycle
//!
//! Desktop previews are served by the tool's local dev server
//! (`<tool> force:lightning:lwc:start`). Liveness is a TCP probe of the
//! server's port. A started server is detached from this process so the
//! browser preview keeps working after `lwcp` exits.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::net::TcpStream;
use url::Url;

use lwcp_core::prelude::*;

/// Route under which the dev server serves component previews
pub const DEV_SERVER_PREVIEW_ROUTE: &str = "/lwc/preview";

/// Default dev server address
pub const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:3333";

/// Subcommand that starts the dev server
pub const DEV_SERVER_START_ACTION: &str = "force:lightning:lwc:start";

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Preview route for a component, e.g. `c/foo` → `/lwc/preview/c/foo`.
///
/// Each `/`-separated part of the component identifier is percent-encoded on
/// its own so the namespace separator survives.
pub fn preview_route(component: &str) -> String {
    let encoded: Vec<String> = component
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| utf8_percent_encode(part, SEGMENT).to_string())
        .collect();
    format!("{}/{}", DEV_SERVER_PREVIEW_ROUTE, encoded.join("/"))
}

/// Handle to the tool's local development server
#[derive(Debug, Clone)]
pub struct DevServerProcess {
    program: PathBuf,
    base_url: Url,
    start_timeout: Duration,
    log_file: Option<PathBuf>,
}

impl DevServerProcess {
    pub fn new(program: impl Into<PathBuf>, base_url: Url) -> Self {
        Self {
            program: program.into(),
            base_url,
            start_timeout: Duration::from_secs(60),
            log_file: None,
        }
    }

    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// Redirect the server's output to `path` instead of discarding it
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute browser URL for a component preview
    pub fn preview_url(&self, component: &str) -> Result<Url> {
        self.base_url
            .join(&preview_route(component))
            .map_err(|e| Error::dev_server(format!("invalid preview URL: {}", e)))
    }

    /// Probe the server's port
    pub async fn is_running(&self) -> bool {
        let Some(host) = self.base_url.host_str() else {
            return false;
        };
        let Some(port) = self.base_url.port_or_known_default() else {
            return false;
        };

        match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                trace!("Dev server probe {}:{} failed: {}", host, port, e);
                false
            }
            Err(_) => false,
        }
    }

    /// Start the server and wait until it accepts connections.
    pub async fn start(&self) -> Result<()> {
        info!(
            "Starting dev server: {} {}",
            self.program.display(),
            DEV_SERVER_START_ACTION
        );

        let mut child = Command::new(&self.program)
            .arg(DEV_SERVER_START_ACTION)
            .stdin(Stdio::null())
            .stdout(self.output_stdio()?)
            .stderr(self.output_stdio()?)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.program.display().to_string())
                } else {
                    Error::dev_server(format!("failed to start: {}", e))
                }
            })?;

        let deadline = tokio::time::Instant::now() + self.start_timeout;
        loop {
            if self.is_running().await {
                info!("Dev server is up at {}", self.base_url);
                return Ok(());
            }

            if let Some(status) = child.try_wait()? {
                return Err(Error::dev_server(format!(
                    "server exited before it was ready ({})",
                    status
                )));
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(Error::dev_server(format!(
                    "server did not respond at {} within {}s",
                    self.base_url,
                    self.start_timeout.as_secs()
                )));
            }

            tokio::time::sleep(PROBE_INTERVAL).await;
        }
    }

    fn output_stdio(&self) -> Result<Stdio> {
        match &self.log_file {
            Some(path) => Ok(Stdio::from(open_append(path)?)),
            None => Ok(Stdio::null()),
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}
