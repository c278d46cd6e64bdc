//! Persistent key/value state
//!
//! Stored as JSON at `<data_local_dir>/lwc-preview/state.json`. Writers take an
//! exclusive lock on a sidecar lock file, then replace the state file through
//! a temp file and rename, so concurrent invocations never see a torn file.
//! Concurrent writes to the same key are last-write-wins.

use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use lwcp_core::logging::data_directory;
use lwcp_core::prelude::*;

use super::KeyValueStore;

const STATE_FILENAME: &str = "state.json";
const LOCK_FILENAME: &str = "state.json.lock";

/// Where a [`StateStore`] keeps its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreScope {
    /// Per-user data directory
    User,
    /// An explicit directory (tests, portable installs)
    Directory(PathBuf),
}

impl StoreScope {
    fn directory(&self) -> PathBuf {
        match self {
            StoreScope::User => data_directory(),
            StoreScope::Directory(dir) => dir.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// File-backed [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Open the store for `scope`, creating its directory if needed
    pub fn init(scope: StoreScope) -> Result<Self> {
        let dir = scope.directory();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::store(format!("Failed to create {:?}: {}", dir, e)))?;
        debug!("State store at {:?}", dir.join(STATE_FILENAME));
        Ok(Self { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }

    fn lock_file(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILENAME))
            .map_err(|e| Error::store(format!("Failed to open state lock: {}", e)))
    }

    fn read_state(path: &Path) -> StateFile {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt state file {:?}: {}", path, e);
                StateFile::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StateFile::default(),
            Err(e) => {
                warn!("Failed to read state file {:?}: {}", path, e);
                StateFile::default()
            }
        }
    }

    fn write_state(&self, state: &StateFile) -> Result<()> {
        let path = self.path();
        let temp_path = self.dir.join(format!("{}.tmp", STATE_FILENAME));
        let content = serde_json::to_string_pretty(state)?;

        let mut temp = File::create(&temp_path)
            .map_err(|e| Error::store(format!("Failed to create temp state file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| Error::store(format!("Failed to write temp state file: {}", e)))?;
        temp.sync_all()
            .map_err(|e| Error::store(format!("Failed to sync temp state file: {}", e)))?;

        std::fs::rename(&temp_path, &path)
            .map_err(|e| Error::store(format!("Failed to replace state file: {}", e)))?;
        Ok(())
    }
}

impl KeyValueStore for StateStore {
    fn get(&self, key: &str) -> Option<String> {
        let lock = self.lock_file().ok()?;
        if let Err(e) = lock.lock_shared() {
            warn!("Failed to lock state for reading: {}", e);
            return None;
        }
        Self::read_state(&self.path()).values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let lock = self.lock_file()?;
        lock.lock_exclusive()
            .map_err(|e| Error::store(format!("Failed to lock state: {}", e)))?;

        let mut state = Self::read_state(&self.path());
        state.values.insert(key.to_string(), value.to_string());
        state.updated_at = Some(Utc::now());
        self.write_state(&state)?;

        debug!("Stored {} = {:?}", key, value);
        // Lock is released when `lock` is dropped
        Ok(())
    }
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
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
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().ok()?;
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_state_store_round_trip_across_instances() {
        let temp = tempdir().unwrap();
        let scope = StoreScope::Directory(temp.path().join("state"));

        let store = StateStore::init(scope.clone()).unwrap();
        assert_eq!(store.get("lastiOSDevice"), None);
        store.set("lastiOSDevice", "iPhone 15").unwrap();
        store.set("lastAndroidDevice", "Pixel").unwrap();

        let reopened = StateStore::init(scope).unwrap();
        assert_eq!(reopened.get("lastiOSDevice").as_deref(), Some("iPhone 15"));
        assert_eq!(reopened.get("lastAndroidDevice").as_deref(), Some("Pixel"));
    }

    #[test]
    fn test_state_store_overwrites_and_stamps() {
        let temp = tempdir().unwrap();
        let store = StateStore::init(StoreScope::Directory(temp.path().to_path_buf())).unwrap();
        store.set("lastiOSDevice", "a").unwrap();
        store.set("lastiOSDevice", "b").unwrap();
        assert_eq!(store.get("lastiOSDevice").as_deref(), Some("b"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["values"]["lastiOSDevice"], "b");
        assert!(raw["updated_at"].is_string());
        assert!(!temp.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_state_store_recovers_from_corrupt_file() {
        let temp = tempdir().unwrap();
        let store = StateStore::init(StoreScope::Directory(temp.path().to_path_buf())).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.get("lastiOSDevice"), None);
        store.set("lastiOSDevice", "x").unwrap();
        assert_eq!(store.get("lastiOSDevice").as_deref(), Some("x"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_values([("lastAndroidDevice", "Pixel")]);
        assert_eq!(store.get("lastAndroidDevice").as_deref(), Some("Pixel"));
        store.set("lastAndroidDevice", "Nexus").unwrap();
        assert_eq!(store.get("lastAndroidDevice").as_deref(), Some("Nexus"));
        assert_eq!(store.get("missing"), None);
    }
}
