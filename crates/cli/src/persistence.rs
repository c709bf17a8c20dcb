//! Durable-store gateway. Failures here are logged and swallowed; a
//! session without a working store keeps running in memory.

use log::warn;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use yomiage_core::{Catalog, Snapshot, VersionedSnapshot};

pub const STORAGE_KEY: &str = "yomiage_state_v2";
pub const LEGACY_STORAGE_KEY: &str = "yomiage_state_v1";

/// String key/value store, the shape the persisted contract assumes.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&mut self, key: &str) -> Result<(), String>;
}

/// One file per key under a state directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn default_dir() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("YOMIAGE_STATE_DIR") {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".yomiage"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|err| err.to_string())?;
        fs::write(self.key_path(key), value).map_err(|err| err.to_string())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.to_string()),
        }
    }
}

/// In-memory fallback for when no state directory is available, and
/// the store used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Best-effort write of the current snapshot.
pub fn save(store: &mut dyn StateStore, snapshot: &Snapshot) {
    let body = match serde_json::to_string(snapshot) {
        Ok(body) => body,
        Err(err) => {
            warn!("failed to serialize state: {err}");
            return;
        }
    };
    if let Err(err) = store.set(STORAGE_KEY, &body) {
        warn!("failed to persist state: {err}");
    }
}

/// Reads the current key, falling back to the legacy key with a
/// one-time migration (the upgraded blob is written back under the
/// current key and the legacy key removed). Returns `None` for absent,
/// unreadable or invalid state; the caller treats that as first-run.
pub fn load(store: &mut dyn StateStore, catalog: &Catalog) -> Option<Snapshot> {
    let snapshot = read_any(store)?;
    if !snapshot.is_valid(catalog) {
        warn!("stored state references unknown cards, discarding");
        return None;
    }
    Some(snapshot)
}

fn read_any(store: &mut dyn StateStore) -> Option<Snapshot> {
    if let Some(raw) = store.get(STORAGE_KEY) {
        return match serde_json::from_str::<VersionedSnapshot>(&raw) {
            Ok(payload) => Some(payload.upgrade()),
            Err(err) => {
                warn!("stored state unreadable: {err}");
                None
            }
        };
    }
    let raw = store.get(LEGACY_STORAGE_KEY)?;
    match serde_json::from_str::<VersionedSnapshot>(&raw) {
        Ok(payload) => {
            let migrated = payload.upgrade();
            match serde_json::to_string(&migrated) {
                Ok(body) => {
                    if let Err(err) = store.set(STORAGE_KEY, &body) {
                        warn!("failed to write migrated state: {err}");
                    }
                }
                Err(err) => warn!("failed to serialize migrated state: {err}"),
            }
            if let Err(err) = store.remove(LEGACY_STORAGE_KEY) {
                warn!("failed to drop legacy state: {err}");
            }
            Some(migrated)
        }
        Err(err) => {
            warn!("legacy state unreadable: {err}");
            None
        }
    }
}

/// Removes both keys. Run whenever a load attempt came back invalid so
/// a broken blob cannot re-trigger a failed migration.
pub fn clear(store: &mut dyn StateStore) {
    for key in [STORAGE_KEY, LEGACY_STORAGE_KEY] {
        if let Err(err) = store.remove(key) {
            warn!("failed to clear {key}: {err}");
        }
    }
}
