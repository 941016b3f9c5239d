//! Atomic JSON file operations.
//!
//! Provides a thin layer for all-or-nothing access to a single JSON document.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicJsonError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicJsonError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicJsonError {}

impl From<std::io::Error> for AtomicJsonError {
    fn from(e: std::io::Error) -> Self {
        AtomicJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicJsonError {
    fn from(e: serde_json::Error) -> Self {
        AtomicJsonError::JsonError(e)
    }
}

impl From<AtomicJsonError> for vguess_core::VguessError {
    fn from(err: AtomicJsonError) -> Self {
        match err {
            AtomicJsonError::IoError(e) => e.into(),
            AtomicJsonError::JsonError(e) => e.into(),
            AtomicJsonError::LockError(message) => vguess_core::VguessError::io(message),
        }
    }
}

/// A handle to a JSON document that is replaced atomically.
///
/// Provides:
/// - **Atomicity**: Writes go to a tmp file that is renamed over the target
/// - **Consistency**: A read yields a complete document or an error, never a prefix
/// - **Isolation**: An exclusive lock file serializes writers
/// - **Durability**: Explicit fsync before rename
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new handle for the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the file atomically, under the writer lock.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        let _lock = self.acquire_lock()?;

        // Serialize before touching the disk so a failure leaves the old file intact
        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.get_temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the file. Missing files are not an error.
    pub fn remove(&self) -> Result<(), AtomicJsonError> {
        let _lock = self.acquire_lock()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Gets a temporary file path next to the target.
    fn get_temp_path(&self) -> Result<PathBuf, AtomicJsonError> {
        let parent = self.path.parent().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }

    fn acquire_lock(&self) -> Result<FileLock, AtomicJsonError> {
        FileLock::acquire(&self.path)
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                AtomicJsonError::LockError(format!("Failed to acquire lock: {}", e))
            })?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the handle is dropped; the file itself is best effort
        let _ = fs::remove_file(&self.lock_path);
    }
}
