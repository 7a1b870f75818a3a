//! Config Store
//!
//! Byte-level persistence for the reconciled configuration file. Reads report a
//! missing file as `None`; writes replace the whole file.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted configuration store interface
pub trait ConfigStore: Send + Sync {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        (**self).write(path, bytes)
    }
}

/// Filesystem-backed store.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target, so a
/// reader never observes a half-written document.
#[derive(Debug, Default, Clone)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigStore for FileStore {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, bytes).map_err(|e| {
            Error::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        std::fs::rename(&tmp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            Error::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })
    }
}

/// In-memory store, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one file.
    pub fn with_file(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.lock().insert(path.into(), bytes.into());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self.lock().get(path).cloned())
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.lock().insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
