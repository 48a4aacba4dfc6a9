//! Test helpers for building temporary stores and listings.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use super::*;

/// Temporary directory holding a store and candidate listings.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn store_dir(&self) -> Utf8PathBuf {
        self.root.join("store")
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write the three-restaurant listing used across CLI tests.
    pub(super) fn write_restaurants(&self) -> Utf8PathBuf {
        let path = self.path("restaurants.json");
        write_utf8(
            &path,
            r#"[
                {"id": "1", "name": "Da Michele", "category": "Pizza", "price": "€€"},
                {"id": "2", "name": "Kaito", "category": "Sushi", "price": "€€"},
                {"id": "3", "name": "Sorbillo", "category": "Pizza", "price": "€"}
            ]"#,
        );
        path
    }

    pub(super) fn write_reservations(&self) -> Utf8PathBuf {
        let path = self.path("reservations.json");
        write_utf8(
            &path,
            r#"[
                {"id": "a", "status": "confirmed", "numberGuests": 2,
                 "restaurants": {"name": "Kaito", "location": "Porto"}},
                {"id": "b", "status": "pending",
                 "restaurants": {"name": "Sorbillo", "location": "Lisboa"}}
            ]"#,
        );
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// Parse `argv` and run the command, capturing stdout.
pub(super) fn run_cli<I, T>(argv: I) -> (Result<(), CliError>, String)
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut stdout = Vec::new();
    let result = Cli::try_parse_from(argv)
        .map_err(CliError::from)
        .and_then(|cli| dispatch(cli.command, &mut stdout));
    let output = String::from_utf8(stdout).expect("stdout utf-8");
    (result, output)
}
