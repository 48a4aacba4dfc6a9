//! Error types emitted by the Forkful CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use forkful_core::{FileKeyValueStoreError, PreferenceStoreError};
#[cfg(feature = "store-sqlite")]
use forkful_core::SqliteKeyValueStoreError;
use thiserror::Error;

/// Errors emitted by the Forkful CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// `record` was invoked without anything to record.
    #[error("nothing to record (set --category and/or --price)")]
    NothingToRecord,
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that provides the operation.
        feature: &'static str,
        /// What the user tried to do.
        action: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the file-backed preference store failed.
    #[error(transparent)]
    OpenFileStore(#[from] FileKeyValueStoreError),
    /// Creating the store directory failed.
    #[error("failed to prepare store directory {path:?}: {source}")]
    PrepareStoreDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite-backed preference store failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenSqliteStore(#[from] SqliteKeyValueStoreError),
    /// The persisted preferences could not be read.
    #[error("failed to read preferences: {0}")]
    LoadPreferences(#[source] PreferenceStoreError),
    /// Opening a candidate list failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenCandidates {
        /// Option naming the list.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A candidate list was not a JSON array of records.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseCandidates {
        /// Option naming the list.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
