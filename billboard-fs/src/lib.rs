//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Every leaderboard, snapshot and pool file goes through these helpers so
//! that writes are atomic and directory handling stays consistent between
//! absolute and relative data roots.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};
use std::path::Component;
use tempfile::NamedTempFile;

/// Read a whole UTF-8 file into a string.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Resolve an ambient directory for the given path and return the directory with the file name.
fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Ensure the parent directory for `path` exists, handling absolute paths safely for cap-std.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => ensure_dir(parent),
        None => Ok(()),
    }
}

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() || path == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Return whether `path` is an existing directory.
///
/// A missing path, or a missing ancestor, reports `false` rather than an error.
pub fn dir_exists(path: &Utf8Path) -> io::Result<bool> {
    let lookup = open_dir_and_file(path).and_then(|(dir, name)| dir.metadata(name.as_str()));
    match lookup {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path` atomically.
///
/// The bytes are written to a temporary file in the destination directory,
/// flushed to disk, then renamed over `path`. Readers observe either the old
/// or the new contents, never a torn write.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent.as_std_path())?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged
        .persist(path.as_std_path())
        .map_err(|persist_err| persist_err.error)?;
    Ok(())
}

/// List the stems of regular files in `dir` that carry `extension`.
///
/// Names are returned in ascending order. Temporary files left behind by an
/// interrupted [`write_atomic`] never match because they carry no extension.
pub fn list_file_stems(dir: &Utf8Path, extension: &str) -> io::Result<Vec<String>> {
    let handle = fs_utf8::Dir::open_ambient_dir(dir, ambient_authority())?;
    let mut stems = Vec::new();
    for listed in handle.entries()? {
        let entry = listed?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name()?;
        let path = Utf8Path::new(&name);
        if path.extension() == Some(extension)
            && let Some(stem) = path.file_stem()
        {
            stems.push(stem.to_owned());
        }
    }
    stems.sort_unstable();
    Ok(stems)
}

/// List the names of sub-directories of `dir`, skipping hidden entries.
pub fn list_dir_names(dir: &Utf8Path) -> io::Result<Vec<String>> {
    let handle = fs_utf8::Dir::open_ambient_dir(dir, ambient_authority())?;
    let mut names = Vec::new();
    for listed in handle.entries()? {
        let entry = listed?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name()?;
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Rename a file or directory, failing if the parents cannot be opened.
pub fn rename_path(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    let (from_dir, from_name) = open_dir_and_file(from)?;
    ensure_parent_dir(to)?;
    let (to_dir, to_name) = open_dir_and_file(to)?;
    from_dir.rename(from_name.as_str(), &to_dir, to_name.as_str())
}

/// Copy a single file, creating the destination's parent directory.
pub fn copy_file(from: &Utf8Path, to: &Utf8Path) -> io::Result<u64> {
    let (from_dir, from_name) = open_dir_and_file(from)?;
    ensure_parent_dir(to)?;
    let (to_dir, to_name) = open_dir_and_file(to)?;
    from_dir.copy(from_name.as_str(), &to_dir, to_name.as_str())
}

/// Recursively remove a directory; a missing directory is not an error.
pub fn remove_dir_all_if_exists(path: &Utf8Path) -> io::Result<()> {
    if !dir_exists(path)? {
        return Ok(());
    }
    let (dir, name) = open_dir_and_file(path)?;
    dir.remove_dir_all(name.as_str())
}

/// Split an absolute or relative path into an ambient base directory and a relative suffix.
fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
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
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        // Relative path: resolve from the current directory.
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;

    Ok((dir, relative))
}
