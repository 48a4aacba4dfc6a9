//! Filesystem-backed `KeyValueStore`: one JSON file per key.

use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use forkful_fs::Dir;
use thiserror::Error;

use super::{KeyValueStore, StoreError};

const FILE_EXTENSION: &str = "json";

/// Error raised while opening a [`FileKeyValueStore`].
#[derive(Debug, Error)]
#[error("failed to open store directory {path}: {source}")]
pub struct FileKeyValueStoreError {
    /// Directory that could not be created or opened.
    pub path: Utf8PathBuf,
    /// Source error from std I/O.
    #[source]
    pub source: std::io::Error,
}

/// Key-value store keeping each key in `<root>/<key>.json`.
///
/// Values are replaced via write-then-rename, and writers are serialised so
/// concurrent `set` calls never interleave their temporary files.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Dir,
    writer: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open the store rooted at `root`, creating the directory when missing.
    ///
    /// # Errors
    /// Returns [`FileKeyValueStoreError`] when the directory cannot be created
    /// or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, FileKeyValueStoreError> {
        let dir = forkful_fs::open_or_create_dir(root).map_err(|source| FileKeyValueStoreError {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
            writer: Mutex::new(()),
        })
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the file that holds `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys that are not safe file names.
    pub fn path_for(&self, key: &str) -> Result<Utf8PathBuf, StoreError> {
        file_name_for(key).map(|name| self.root.join(name))
    }
}

fn file_name_for(key: &str) -> Result<String, StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(format!("{key}.{FILE_EXTENSION}"))
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_owned(),
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let name = file_name_for(key)?;
        forkful_fs::read_optional(&self.dir, &name).map_err(|source| StoreError::Read {
            key: key.to_owned(),
            source: Box::new(source),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let name = file_name_for(key)?;
        let _guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        forkful_fs::replace_file(&self.dir, &name, value).map_err(|source| StoreError::Write {
            key: key.to_owned(),
            source: Box::new(source),
        })
    }
}
