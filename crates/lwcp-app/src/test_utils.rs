//! Recording fakes for the collaborator traits
//!
//! Available in unit tests and, with the `test-helpers` feature, to
//! downstream integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use url::Url;

use lwcp_core::prelude::*;
use lwcp_core::PlatformOption;
use lwcp_launcher::preview_route;

use crate::services::{
    BrowserOpener, DevServer, KeyValueStore, MemoryStore, Notifier, OutputLog, Prompter,
    Telemetry,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Severity of a recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        lock(&self.notices).clone()
    }

    fn at(&self, level: NoticeLevel) -> Vec<String> {
        lock(&self.notices)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(NoticeLevel::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(NoticeLevel::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(NoticeLevel::Error)
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        lock(&self.notices).push((NoticeLevel::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        lock(&self.notices).push((NoticeLevel::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        lock(&self.notices).push((NoticeLevel::Error, message.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingOutput {
    lines: Mutex<Vec<String>>,
    reveals: AtomicUsize,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.load(Ordering::SeqCst)
    }
}

impl OutputLog for RecordingOutput {
    fn append_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }

    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    commands: Mutex<Vec<String>>,
    exceptions: Mutex<Vec<(String, String)>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        lock(&self.commands).clone()
    }

    pub fn exceptions(&self) -> Vec<(String, String)> {
        lock(&self.exceptions).clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn send_command_event(&self, log_name: &str, _duration: Duration) {
        lock(&self.commands).push(log_name.to_string());
    }

    fn send_exception(&self, log_name: &str, message: &str) {
        lock(&self.exceptions).push((log_name.to_string(), message.to_string()));
    }
}

/// Store that records every write
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: MemoryStore::with_values(values),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.writes).push((key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }
}

/// Prompter with fixed answers. Records every prompt it is shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pick: Option<usize>,
    input: Option<String>,
    fails: bool,
    pick_prompts: Mutex<Vec<String>>,
    input_prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// `None` answers cancel the corresponding prompt
    pub fn new(pick: Option<usize>, input: Option<&str>) -> Self {
        Self {
            pick,
            input: input.map(str::to_string),
            ..Self::default()
        }
    }

    /// Every prompt fails as if the terminal could not be opened
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }

    fn answer<T>(&self, value: T) -> Result<T> {
        if self.fails {
            return Err(Error::terminal("not a terminal"));
        }
        Ok(value)
    }

    pub fn pick_prompts(&self) -> Vec<String> {
        lock(&self.pick_prompts).clone()
    }

    pub fn input_prompts(&self) -> Vec<String> {
        lock(&self.input_prompts).clone()
    }
}

impl Prompter for ScriptedPrompter {
    async fn pick(&self, placeholder: &str, _options: &[PlatformOption]) -> Result<Option<usize>> {
        lock(&self.pick_prompts).push(placeholder.to_string());
        self.answer(self.pick)
    }

    async fn input(&self, placeholder: &str) -> Result<Option<String>> {
        lock(&self.input_prompts).push(placeholder.to_string());
        self.answer(self.input.clone())
    }
}

/// Dev server that is either running or starts on request
#[derive(Debug)]
pub struct FakeDevServer {
    base_url: Url,
    running: AtomicBool,
    start_fails: bool,
    starts: AtomicUsize,
}

impl FakeDevServer {
    pub fn new(running: bool) -> Self {
        Self {
            base_url: Url::parse("http://localhost:3333").expect("valid URL"),
            running: AtomicBool::new(running),
            start_fails: false,
            starts: AtomicUsize::new(0),
        }
    }

    pub fn failing_start() -> Self {
        Self {
            start_fails: true,
            ..Self::new(false)
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl DevServer for FakeDevServer {
    async fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.start_fails {
            return Err(Error::dev_server("server did not start"));
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn preview_url(&self, component: &str) -> Result<Url> {
        self.base_url
            .join(&preview_route(component))
            .map_err(|e| Error::dev_server(e.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<Url>>,
    fail: bool,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<Url> {
        lock(&self.opened).clone()
    }
}

impl BrowserOpener for RecordingBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        if self.fail {
            return Err(Error::browser("no browser available"));
        }
        lock(&self.opened).push(url.clone());
        Ok(())
    }
}

/// Write an executable shell script standing in for the CLI tool
#[cfg(unix)]
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-sfdx");
    let script = format!("#!/bin/sh\n{}\n", body);
    std::fs::write(&path, script).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make fake tool executable");
    path
}

/// Create `<root>/force-app/main/default/lwc/<name>/<name>.js`; returns the bundle directory
pub fn make_component(root: &Path, name: &str) -> PathBuf {
    let bundle = root.join("force-app/main/default/lwc").join(name);
    std::fs::create_dir_all(&bundle).expect("create component bundle");
    std::fs::write(bundle.join(format!("{}.js", name)), "").expect("write component file");
    bundle
}
