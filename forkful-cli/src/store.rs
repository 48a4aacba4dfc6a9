//! Opening the preference store selected on the command line.

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use forkful_core::{FileKeyValueStore, KeyValueStore, PreferenceStore};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Database file used by the SQLite backend inside the store directory.
pub(crate) const SQLITE_FILE_NAME: &str = "preferences.db";

/// Preference store opened by a command.
pub(crate) type CliPreferenceStore = PreferenceStore<Box<dyn KeyValueStore>>;

/// Durable backend holding the preference record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Backend {
    /// One JSON file per key inside the store directory.
    #[default]
    File,
    /// A `kv` table in `preferences.db` inside the store directory.
    Sqlite,
}

/// Resolved store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreConfig {
    pub(crate) dir: Utf8PathBuf,
    pub(crate) backend: Backend,
}

impl StoreConfig {
    /// Fill in defaults: the current directory and the file backend.
    pub(crate) fn resolve(dir: Option<Utf8PathBuf>, backend: Option<Backend>) -> Self {
        Self {
            dir: dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
            backend: backend.unwrap_or_default(),
        }
    }

    pub(crate) fn open(&self) -> Result<CliPreferenceStore, CliError> {
        debug!("Opening {:?} preference store in {}", self.backend, self.dir);
        let backend: Box<dyn KeyValueStore> = match self.backend {
            Backend::File => Box::new(FileKeyValueStore::open(&self.dir)?),
            Backend::Sqlite => open_sqlite(&self.dir)?,
        };
        Ok(PreferenceStore::new(backend))
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(dir: &Utf8Path) -> Result<Box<dyn KeyValueStore>, CliError> {
    forkful_fs::open_or_create_dir(dir).map_err(|source| CliError::PrepareStoreDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let store = forkful_core::SqliteKeyValueStore::open(dir.join(SQLITE_FILE_NAME))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_dir: &Utf8Path) -> Result<Box<dyn KeyValueStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "the sqlite backend",
    })
}
