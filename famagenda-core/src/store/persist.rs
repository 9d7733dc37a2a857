//! On-device persistence for the stores.
//!
//! Each store is written as one JSON document named after its storage key:
//! ```text
//! <DATA_DIR>/
//!   family-storage.json
//!   auth-storage.json
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Storage key of the client store.
pub const FAMILY_STORAGE_KEY: &str = "family-storage";

/// Storage key of the auth/family-context store.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Errors that can occur while reading or writing a state file.
#[derive(Debug)]
pub enum PersistError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// The file exists but does not hold valid state.
    Corrupt(PathBuf, serde_json::Error),
    /// State could not be serialized.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            PersistError::Corrupt(path, e) => {
                write!(f, "Invalid state in {}: {}", path.display(), e)
            }
            PersistError::Serialize(e) => write!(f, "Failed to serialize state: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(_, e) => Some(e),
            PersistError::Corrupt(_, e) | PersistError::Serialize(e) => Some(e),
        }
    }
}

/// A JSON state document stored under a namespaced key.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored state.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, PersistError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| PersistError::Corrupt(self.path.clone(), e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io(self.path.clone(), e)),
        }
    }

    /// Writes the state, creating the data directory if needed.
    pub fn save<T: Serialize>(&self, state: &T) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| PersistError::Io(dir.to_path_buf(), e))?;
        }

        let bytes = serde_json::to_vec_pretty(state).map_err(PersistError::Serialize)?;

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).map_err(|e| PersistError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| PersistError::Io(self.path.clone(), e))?;

        Ok(())
    }

    /// Removes the stored state. Missing files are not an error.
    pub fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Io(self.path.clone(), e)),
        }
    }
}

/// Whether the result of a store operation means the state changed.
pub(crate) trait Outcome {
    fn changed(&self) -> bool;
}

impl Outcome for () {
    fn changed(&self) -> bool {
        true
    }
}

impl Outcome for bool {
    fn changed(&self) -> bool {
        *self
    }
}

/// A count of affected entries.
impl Outcome for usize {
    fn changed(&self) -> bool {
        *self > 0
    }
}

impl<T> Outcome for Option<T> {
    fn changed(&self) -> bool {
        self.is_some()
    }
}

impl<T: Outcome, E> Outcome for Result<T, E> {
    fn changed(&self) -> bool {
        matches!(self, Ok(value) if value.changed())
    }
}

impl Outcome for String {
    fn changed(&self) -> bool {
        true
    }
}

/// Writes store snapshots in revision order.
///
/// A store takes a revision and a snapshot while it holds its write lock and
/// writes after releasing it. A snapshot older than the one already on disk
/// is skipped.
#[derive(Debug)]
pub(crate) struct Persister {
    file: StateFile,
    revision: AtomicU64,
    written: Mutex<u64>,
}

impl Persister {
    pub fn new(file: StateFile) -> Self {
        Self {
            file,
            revision: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, PersistError> {
        self.file.load()
    }

    /// Must be called while the store's write lock is held.
    pub fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Saves `state` unless a newer revision is already written. Returns
    /// whether the file was written.
    pub fn write<T: Serialize>(&self, revision: u64, state: &T) -> Result<bool, PersistError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if *written >= revision {
            return Ok(false);
        }
        self.file.save(state)?;
        *written = revision;
        Ok(true)
    }
}
