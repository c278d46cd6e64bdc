//! Wires the pipeline to real collaborators and runs it once

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use url::Url;

use lwcp_app::{
    find_project_root, load_settings, CancelPrompter, Collaborators, DevServer, KeyValueStore,
    MemoryStore, Notifier, OutputLog, PresetPrompter, PreviewOrchestrator, PreviewStatus,
    Prompter, Settings, SfdxModuleResolver, StateStore, StoreScope, SystemBrowser, Telemetry,
    TracingTelemetry,
};
use lwcp_core::logging::data_directory;
use lwcp_core::prelude::*;
use lwcp_core::PlatformKind;
use lwcp_launcher::{DevServerProcess, ToolAvailability};
use lwcp_tui::TuiPrompter;

use crate::console::{ConsoleNotifier, FileOutputLog};
use crate::headless::{HeadlessEvent, HeadlessSink};
use crate::signals::spawn_signal_handler;

/// Fallback source path when none is given on the command line
pub const ACTIVE_FILE_ENV: &str = "LWC_PREVIEW_ACTIVE_FILE";

const OUTPUT_LOG_FILENAME: &str = "output.log";
const DEV_SERVER_LOG_FILENAME: &str = "dev-server.log";

/// One invocation of the launcher
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub source: Option<PathBuf>,
    pub platform: Option<PlatformKind>,
    pub target: Option<String>,
    pub headless: bool,
    pub project: Option<PathBuf>,
}

impl RunOptions {
    /// Command-line source, else the active-file environment variable
    pub fn source(&self) -> Option<PathBuf> {
        self.source.clone().or_else(|| {
            std::env::var_os(ACTIVE_FILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }

    /// Explicit project, else the nearest ancestor holding the project
    /// marker (searching from the source, then the working directory)
    pub fn project_root(&self, source: Option<&Path>) -> PathBuf {
        if let Some(project) = &self.project {
            return project.clone();
        }
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let from_source = source.map(|s| if s.is_absolute() { s.to_path_buf() } else { cwd.join(s) });

        from_source
            .as_deref()
            .and_then(find_project_root)
            .or_else(|| find_project_root(&cwd))
            .unwrap_or(cwd)
    }
}

/// Run the preview pipeline once and report how it ended
pub async fn run(options: RunOptions) -> Result<PreviewStatus> {
    let source = options.source();
    let project = options.project_root(source.as_deref());
    info!("Project root: {}", project.display());

    let settings = load_settings(&project);
    let store = open_store(StateStore::init(StoreScope::User));
    let dev_server = dev_server(&settings);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    spawn_signal_handler(shutdown_tx);

    let status = if options.headless {
        let source_label = source.as_ref().map(|s| s.display().to_string());
        HeadlessEvent::started(source_label.as_deref(), &project.display().to_string()).emit();

        let sink = Arc::new(HeadlessSink);
        let prompter = PresetPrompter::new(CancelPrompter)
            .with_platform(options.platform)
            .with_target(options.target.clone());
        let status = execute(
            prompter,
            Sinks {
                notifier: sink.clone(),
                output: sink.clone(),
                telemetry: sink,
            },
            &settings,
            dev_server,
            store,
            &project,
            shutdown_rx,
            source.as_deref(),
        )
        .await;

        HeadlessEvent::finished(status).emit();
        status
    } else {
        let output = FileOutputLog::open(data_directory().join(OUTPUT_LOG_FILENAME), true);
        debug!("Output log at {}", output.path().display());

        let prompter = PresetPrompter::new(TuiPrompter::default())
            .with_platform(options.platform)
            .with_target(options.target.clone());
        execute(
            prompter,
            Sinks {
                notifier: Arc::new(ConsoleNotifier),
                output: Arc::new(output),
                telemetry: Arc::new(TracingTelemetry),
            },
            &settings,
            dev_server,
            store,
            &project,
            shutdown_rx,
            source.as_deref(),
        )
        .await
    };

    info!("Preview finished: {:?}", status);
    Ok(status)
}

struct Sinks {
    notifier: Arc<dyn Notifier>,
    output: Arc<dyn OutputLog>,
    telemetry: Arc<dyn Telemetry>,
}

#[allow(clippy::too_many_arguments)]
async fn execute<P: Prompter>(
    prompter: P,
    sinks: Sinks,
    settings: &Settings,
    dev_server: DesktopServer,
    store: Arc<dyn KeyValueStore>,
    project: &Path,
    shutdown: watch::Receiver<bool>,
    source: Option<&Path>,
) -> PreviewStatus {
    let collaborators = Collaborators {
        prompter,
        dev_server,
        browser: Arc::new(SystemBrowser),
        resolver: Arc::new(SfdxModuleResolver::new()),
        store,
        notifier: sinks.notifier,
        output: sinks.output,
        telemetry: sinks.telemetry,
    };

    PreviewOrchestrator::new(settings, collaborators)
        .with_shutdown(shutdown)
        .with_working_dir(project)
        .execute(source)
        .await
}

/// Remembered devices live in the user store. When it cannot be opened the
/// preview still runs, it just forgets devices on exit.
fn open_store(store: Result<StateStore>) -> Arc<dyn KeyValueStore> {
    match store {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("State store unavailable, devices will not be remembered: {}", e);
            Arc::new(MemoryStore::new())
        }
    }
}

/// Dev server for desktop previews. A bad base URL only fails the desktop
/// branch; mobile previews never touch it.
enum DesktopServer {
    Ready(DevServerProcess),
    Misconfigured(String),
}

impl DevServer for DesktopServer {
    async fn is_running(&self) -> bool {
        match self {
            DesktopServer::Ready(server) => server.is_running().await,
            DesktopServer::Misconfigured(_) => false,
        }
    }

    async fn start(&self) -> Result<()> {
        match self {
            DesktopServer::Ready(server) => server.start().await,
            DesktopServer::Misconfigured(message) => Err(Error::config(message.clone())),
        }
    }

    fn preview_url(&self, component: &str) -> Result<Url> {
        match self {
            DesktopServer::Ready(server) => server.preview_url(component),
            DesktopServer::Misconfigured(message) => Err(Error::config(message.clone())),
        }
    }
}

fn dev_server(settings: &Settings) -> DesktopServer {
    let base_url = match Url::parse(&settings.dev_server.base_url) {
        Ok(url) => url,
        Err(e) => {
            let message = format!(
                "Invalid dev server URL {:?}: {}",
                settings.dev_server.base_url, e
            );
            warn!("{}", message);
            return DesktopServer::Misconfigured(message);
        }
    };

    let availability = ToolAvailability::check(&settings.tool.executable);
    let program = availability
        .resolved
        .unwrap_or_else(|| PathBuf::from(&settings.tool.executable));

    DesktopServer::Ready(
        DevServerProcess::new(program, base_url)
            .with_start_timeout(Duration::from_secs(settings.dev_server.start_timeout_secs))
            .with_log_file(data_directory().join(DEV_SERVER_LOG_FILENAME)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwcp_app::test_utils::{
        make_component, RecordingNotifier, RecordingOutput, RecordingTelemetry,
    };
    #[cfg(unix)]
    use lwcp_app::test_utils::fake_tool;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_source_falls_back_to_env() {
        std::env::set_var(ACTIVE_FILE_ENV, "/work/lwc/hello/hello.js");
        let options = RunOptions::default();
        assert_eq!(
            options.source(),
            Some(PathBuf::from("/work/lwc/hello/hello.js"))
        );

        let options = RunOptions {
            source: Some(PathBuf::from("explicit")),
            ..Default::default()
        };
        assert_eq!(options.source(), Some(PathBuf::from("explicit")));
        std::env::remove_var(ACTIVE_FILE_ENV);
    }

    #[test]
    #[serial]
    fn test_empty_env_is_no_source() {
        std::env::set_var(ACTIVE_FILE_ENV, "");
        assert_eq!(RunOptions::default().source(), None);
        std::env::remove_var(ACTIVE_FILE_ENV);
    }

    #[test]
    fn test_project_root_from_source() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("sfdx-project.json"), "{}").unwrap();
        let bundle = dir.path().join("force-app/main/default/lwc/hello");
        std::fs::create_dir_all(&bundle).unwrap();

        let root = RunOptions::default().project_root(Some(&bundle));
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_explicit_project_wins() {
        let options = RunOptions {
            project: Some(PathBuf::from("/explicit")),
            ..Default::default()
        };
        assert_eq!(options.project_root(None), PathBuf::from("/explicit"));
    }

    fn bad_url_settings() -> Settings {
        let mut settings = Settings::default();
        settings.dev_server.base_url = "not a url".to_string();
        settings
    }

    fn recording_sinks() -> (Sinks, Arc<RecordingNotifier>, Arc<RecordingTelemetry>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let sinks = Sinks {
            notifier: notifier.clone(),
            output: Arc::new(RecordingOutput::new()),
            telemetry: telemetry.clone(),
        };
        (sinks, notifier, telemetry)
    }

    #[tokio::test]
    async fn test_invalid_dev_server_url_fails_only_when_used() {
        let server = dev_server(&bad_url_settings());
        assert!(matches!(server, DesktopServer::Misconfigured(_)));
        assert!(!server.is_running().await);
        assert!(matches!(
            server.preview_url("c/foo"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(server.start().await, Err(Error::Config { .. })));

        let server = dev_server(&Settings::default());
        assert!(matches!(server, DesktopServer::Ready(_)));
    }

    #[tokio::test]
    async fn test_invalid_dev_server_url_fails_desktop_through_reporting() {
        let temp = tempdir().unwrap();
        let bundle = make_component(temp.path(), "foo");
        let settings = bad_url_settings();
        let (sinks, notifier, telemetry) = recording_sinks();
        let (_tx, shutdown) = watch::channel(false);

        let prompter = PresetPrompter::new(CancelPrompter).with_platform(Some(PlatformKind::Desktop));
        let status = execute(
            prompter,
            sinks,
            &settings,
            dev_server(&settings),
            Arc::new(MemoryStore::new()),
            temp.path(),
            shutdown,
            Some(&bundle),
        )
        .await;

        assert_eq!(status, PreviewStatus::Failed);
        assert_eq!(notifier.errors().len(), 1);
        assert_eq!(telemetry.exceptions().len(), 1);
        assert!(telemetry.exceptions()[0].1.contains("Invalid dev server URL"));
    }

    #[test]
    fn test_store_failure_falls_back_to_memory() {
        let store = open_store(Err(Error::store("database is locked")));
        assert_eq!(store.get("lastiOSDevice"), None);
        store.set("lastiOSDevice", "iPhone 15").unwrap();
        assert_eq!(store.get("lastiOSDevice").as_deref(), Some("iPhone 15"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invalid_dev_server_url_does_not_block_mobile() {
        let temp = tempdir().unwrap();
        let bundle = make_component(temp.path(), "foo");
        let tool = fake_tool(temp.path(), "exit 0");
        let mut settings = bad_url_settings();
        settings.tool.executable = tool.display().to_string();
        let (sinks, notifier, telemetry) = recording_sinks();
        let (_tx, shutdown) = watch::channel(false);

        let prompter = PresetPrompter::new(CancelPrompter)
            .with_platform(Some(PlatformKind::Android))
            .with_target(Some(String::new()));
        let status = execute(
            prompter,
            sinks,
            &settings,
            dev_server(&settings),
            open_store(Err(Error::store("unavailable"))),
            temp.path(),
            shutdown,
            Some(&bundle),
        )
        .await;

        assert_eq!(status, PreviewStatus::Succeeded);
        assert!(notifier.errors().is_empty());
        assert!(telemetry.exceptions().is_empty());
    }
}
