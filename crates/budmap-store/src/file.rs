use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;

use crate::{KeyValueStore, StoreError};

/// JSON-file store: one object mapping keys to values.
///
/// Every operation goes to disk under an advisory lock on a sidecar
/// `<path>.lock` file, so any number of handles (in this process or another)
/// can share one path. `put` holds the exclusive lock across read, insert and
/// the temp-file rename; `get` reads under the shared lock.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first `put`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be read.
    /// - [`StoreError::Corrupt`] if it is not a JSON object of strings.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let lock_path = sibling(&path, ".lock");

        let (data, lock) = (path.clone(), lock_path.clone());
        let entries = tokio::task::spawn_blocking(move || read_shared(&data, &lock)).await??;

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file store");

        Ok(Self { path, lock_path })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (path, lock_path) = (self.path.clone(), self.lock_path.clone());
        let (k, v) = (key.to_owned(), value.to_owned());

        let result = tokio::task::spawn_blocking(move || write_exclusive(&path, &lock_path, k, v))
            .await?;
        if let Err(e) = &result {
            tracing::error!(
                path = %self.path.display(),
                key,
                error = %e,
                "file store write failed"
            );
        }
        result
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let (path, lock_path) = (self.path.clone(), self.lock_path.clone());
        let mut entries =
            tokio::task::spawn_blocking(move || read_shared(&path, &lock_path)).await??;
        Ok(entries.remove(key))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn open_lock(lock_path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)
}

/// Read the whole object under the shared lock. A store whose directory does
/// not exist yet is empty.
fn read_shared(path: &Path, lock_path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let lock = match open_lock(lock_path) {
        Ok(lock) => lock,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(io_err(lock_path, e)),
    };
    FileExt::lock_shared(&lock).map_err(|e| io_err(lock_path, e))?;
    // The lock is released when `lock` is dropped.
    read_entries(path)
}

fn write_exclusive(
    path: &Path,
    lock_path: &Path,
    key: String,
    value: String,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let lock = open_lock(lock_path).map_err(|e| io_err(lock_path, e))?;
    FileExt::lock_exclusive(&lock).map_err(|e| io_err(lock_path, e))?;

    let mut entries = read_entries(path)?;
    entries.insert(key, value);

    let body = serde_json::to_vec_pretty(&entries)?;
    let tmp_path = sibling(path, ".tmp");
    std::fs::write(&tmp_path, &body).map_err(|e| io_err(&tmp_path, e))?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "file store written");
    Ok(())
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            source: e,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(io_err(path, e)),
    }
}
