//! Terminal sinks for interactive runs

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lwcp_app::{Notifier, OutputLog};
use lwcp_core::prelude::*;

/// Prints notifications to stderr
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        info!("{}", message);
        eprintln!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
        eprintln!("warning: {}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
        eprintln!("error: {}", message);
    }
}

/// Output channel backed by a file, optionally echoed to stderr.
///
/// Each run appends below a timestamped header so earlier runs stay readable.
#[derive(Debug)]
pub struct FileOutputLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
    echo: bool,
}

impl FileOutputLog {
    /// Open `path` for appending. An unwritable file degrades to echo-only.
    pub fn open(path: impl Into<PathBuf>, echo: bool) -> Self {
        let path = path.into();
        let file = match Self::open_file(&path) {
            Ok(mut file) => {
                let header = format!(
                    "── {} ──",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
                );
                if let Err(e) = writeln!(file, "{}", header) {
                    warn!("Failed to write output log header: {}", e);
                }
                Some(file)
            }
            Err(e) => {
                warn!("Output log {:?} unavailable: {}", path, e);
                None
            }
        };

        Self {
            path,
            file: Mutex::new(file),
            echo,
        }
    }

    fn open_file(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputLog for FileOutputLog {
    fn append_line(&self, line: &str) {
        if self.echo {
            eprintln!("{}", line);
        }
        let mut guard = self.file.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(file) = guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                warn!("Failed to write output log: {}", e);
            }
        }
    }

    fn reveal(&self) {
        let guard = self.file.lock().unwrap_or_else(|p| p.into_inner());
        if guard.is_some() {
            eprintln!("Full output: {}", self.path.display());
        }
    }
}
