//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Durable records are replaced atomically: the new contents are written to a
//! sibling temporary file, flushed, and renamed over the target, so readers see
//! either the old record or the new one and never a torn write.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};
use std::path::Component;

/// Directory capability handed out by [`open_or_create_dir`].
pub use cap_std::fs_utf8::Dir;

const TEMP_SUFFIX: &str = ".tmp";

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let parent = if parent.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        parent
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create `path` (and any missing ancestors) and open it as a capability.
pub fn open_or_create_dir(path: &Utf8Path) -> io::Result<Dir> {
    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_os_str().is_empty() {
        return Ok(base_dir);
    }
    base_dir.create_dir_all(&relative)?;
    base_dir.open_dir(&relative)
}

/// Read `name` from `dir`, returning `None` when the file does not exist.
pub fn read_optional(dir: &Dir, name: &str) -> io::Result<Option<String>> {
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace `name` inside `dir` with `contents` via write-then-rename.
pub fn replace_file(dir: &Dir, name: &str, contents: &str) -> io::Result<()> {
    let temp_name = format!("{name}{TEMP_SUFFIX}");
    let mut file = dir.create(&temp_name)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);
    dir.rename(&temp_name, dir, name)
}

/// Split an absolute or relative path into an ambient base directory and a relative suffix.
pub fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;

    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 tempdir")
    }

    #[rstest]
    fn creates_nested_directories() {
        let temp = TempDir::new().expect("tempdir");
        let nested = utf8_root(&temp).join("a/b/c");
        open_or_create_dir(&nested).expect("create nested dir");
        assert!(nested.as_std_path().is_dir());
    }

    #[rstest]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().expect("tempdir");
        let dir = open_or_create_dir(&utf8_root(&temp)).expect("open dir");
        assert_eq!(read_optional(&dir, "absent.json").expect("read"), None);
    }

    #[rstest]
    fn replace_overwrites_previous_contents() {
        let temp = TempDir::new().expect("tempdir");
        let dir = open_or_create_dir(&utf8_root(&temp)).expect("open dir");
        replace_file(&dir, "record.json", "first").expect("first write");
        replace_file(&dir, "record.json", "second").expect("second write");

        let read = read_optional(&dir, "record.json").expect("read");
        assert_eq!(read.as_deref(), Some("second"));
        assert!(!temp.path().join("record.json.tmp").exists());
    }

    #[rstest]
    fn file_is_file_distinguishes_directories() {
        let temp = TempDir::new().expect("tempdir");
        let root = utf8_root(&temp);
        let dir = open_or_create_dir(&root).expect("open dir");
        replace_file(&dir, "data.json", "[]").expect("write");

        assert!(file_is_file(&root.join("data.json")).expect("inspect file"));
        open_or_create_dir(&root.join("sub")).expect("create sub");
        assert!(!file_is_file(&root.join("sub")).expect("inspect dir"));
    }
}
