//! End-to-end pipeline tests against a scripted stand-in for the CLI tool
//!
//! Run with: cargo test --test pipeline

#![cfg(unix)]

use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use lwcp_app::test_utils::{
    fake_tool, make_component, FakeDevServer, RecordingBrowser, RecordingNotifier,
    RecordingOutput, RecordingTelemetry, ScriptedPrompter,
};
use lwcp_app::{
    CancelPrompter, Collaborators, ContractKind, KeyValueStore, PresetPrompter,
    PreviewOrchestrator, PreviewStatus, Prompter, Settings, SfdxModuleResolver, StateStore,
    StoreScope,
};
use lwcp_core::PlatformKind;

struct Sinks {
    notifier: Arc<RecordingNotifier>,
    output: Arc<RecordingOutput>,
    telemetry: Arc<RecordingTelemetry>,
}

impl Sinks {
    fn new() -> Self {
        Self {
            notifier: Arc::new(RecordingNotifier::new()),
            output: Arc::new(RecordingOutput::new()),
            telemetry: Arc::new(RecordingTelemetry::new()),
        }
    }
}

async fn run<P: Prompter>(
    settings: &Settings,
    prompter: P,
    store: Arc<dyn KeyValueStore>,
    sinks: &Sinks,
    source: &Path,
) -> PreviewStatus {
    PreviewOrchestrator::new(
        settings,
        Collaborators {
            prompter,
            dev_server: FakeDevServer::new(true),
            browser: Arc::new(RecordingBrowser::new()),
            resolver: Arc::new(SfdxModuleResolver::new()),
            store,
            notifier: sinks.notifier.clone(),
            output: sinks.output.clone(),
            telemetry: sinks.telemetry.clone(),
        },
    )
    .execute(Some(source))
    .await
}

fn recording_tool(dir: &Path) -> (String, std::path::PathBuf) {
    let args_file = dir.join("args.txt");
    let tool = fake_tool(
        dir,
        &format!("echo \"$@\" >> '{}'\nexit 0", args_file.display()),
    );
    (tool.to_string_lossy().into_owned(), args_file)
}

#[tokio::test]
async fn test_remembered_device_survives_between_runs() {
    let temp = tempdir().unwrap();
    let bundle = make_component(temp.path(), "hello");
    let (tool, args_file) = recording_tool(temp.path());

    let mut settings = Settings::default();
    settings.tool.executable = tool;
    settings.preview.remember_device = true;

    let state_dir = temp.path().join("state");

    // First run names a simulator
    {
        let store = Arc::new(StateStore::init(StoreScope::Directory(state_dir.clone())).unwrap());
        let prompter = PresetPrompter::new(CancelPrompter)
            .with_platform(Some(PlatformKind::IOS))
            .with_target(Some("iPhone 15".to_string()));
        let sinks = Sinks::new();
        let status = run(&settings, prompter, store, &sinks, &bundle).await;
        assert_eq!(status, PreviewStatus::Succeeded);
    }

    // Second run accepts the offered name with an empty answer
    let store = Arc::new(StateStore::init(StoreScope::Directory(state_dir.clone())).unwrap());
    assert_eq!(store.get("lastiOSDevice").as_deref(), Some("iPhone 15"));

    let prompter = PresetPrompter::new(ScriptedPrompter::new(None, Some("")))
        .with_platform(Some(PlatformKind::IOS));
    let sinks = Sinks::new();
    let status = run(&settings, prompter, store, &sinks, &bundle.join("hello.js")).await;
    assert_eq!(status, PreviewStatus::Succeeded);

    let invocations = std::fs::read_to_string(&args_file).unwrap();
    let lines: Vec<&str> = invocations.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(
            line,
            "force:lightning:lwc:preview -p iOS -t iPhone 15 -f /lwc/preview/c/hello --loglevel warn"
        );
    }
    assert!(sinks.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_component_contract_and_log_level_from_config() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("sfdx-project.json"), "{}").unwrap();
    let bundle = make_component(temp.path(), "card");
    let (tool, args_file) = recording_tool(temp.path());

    let config_dir = lwcp_app::init_config_dir(temp.path()).unwrap();
    assert!(config_dir.exists());

    let mut settings = lwcp_app::load_settings(temp.path());
    settings.tool.executable = tool;
    settings.preview.contract = ContractKind::Component;
    settings.preview.log_level = "debug".to_string();

    let sinks = Sinks::new();
    let prompter = PresetPrompter::new(CancelPrompter)
        .with_platform(Some(PlatformKind::Android))
        .with_target(Some(String::new()));
    let status = run(
        &settings,
        prompter,
        Arc::new(lwcp_app::MemoryStore::new()),
        &sinks,
        &bundle,
    )
    .await;

    assert_eq!(status, PreviewStatus::Succeeded);
    let args = std::fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        args.trim(),
        "force:lightning:lwc:preview -p Android -t SFDXEmulator -d c/card --loglevel debug"
    );
}

#[tokio::test]
async fn test_headless_without_platform_cancels_quietly() {
    let temp = tempdir().unwrap();
    let bundle = make_component(temp.path(), "hello");

    let sinks = Sinks::new();
    let status = run(
        &Settings::default(),
        PresetPrompter::new(CancelPrompter),
        Arc::new(lwcp_app::MemoryStore::new()),
        &sinks,
        &bundle,
    )
    .await;

    assert_eq!(status, PreviewStatus::Cancelled);
    assert_eq!(status.exit_code(), 0);
    assert!(sinks.notifier.errors().is_empty());
    assert!(sinks.notifier.warnings().is_empty());
    assert_eq!(sinks.notifier.infos().len(), 1);
    assert!(sinks.telemetry.exceptions().is_empty());
}

#[tokio::test]
async fn test_failing_tool_surfaces_diagnostics() {
    let temp = tempdir().unwrap();
    let bundle = make_component(temp.path(), "hello");
    let tool = fake_tool(
        temp.path(),
        r#"echo '{"status":1,"name":"NoDevice","message":"No simulator named Pixel"}'
exit 1"#,
    );

    let mut settings = Settings::default();
    settings.tool.executable = tool.to_string_lossy().into_owned();

    let sinks = Sinks::new();
    let prompter = PresetPrompter::new(CancelPrompter)
        .with_platform(Some(PlatformKind::Android))
        .with_target(Some("Pixel".to_string()));
    let status = run(
        &settings,
        prompter,
        Arc::new(lwcp_app::MemoryStore::new()),
        &sinks,
        &bundle,
    )
    .await;

    assert_eq!(status, PreviewStatus::Failed);
    assert_eq!(status.exit_code(), 1);
    let errors = sinks.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Pixel"));
    assert!(sinks
        .output
        .lines()
        .iter()
        .any(|l| l.contains("No simulator named Pixel")));
    assert_eq!(sinks.output.reveal_count(), 1);
    assert_eq!(sinks.telemetry.exceptions().len(), 1);
}
