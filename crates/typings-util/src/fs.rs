//! Filesystem utilities for typings.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::UtilError;

fn io_err(path: &Path, source: std::io::Error) -> UtilError {
    UtilError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Create a directory and all parent directories if they do not exist.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<(), UtilError> {
    std::fs::create_dir_all(path).map_err(|source| io_err(path, source))
}

/// Remove a directory and all its contents. No error if the directory is absent.
///
/// # Errors
/// Returns an error if the directory exists but cannot be removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), UtilError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_err(path, source)),
    }
}

/// Wipe `path` and recreate it as an empty directory.
///
/// # Errors
/// Returns an error if the old directory cannot be removed or the new one created.
pub fn reset_dir(path: &Path) -> Result<(), UtilError> {
    remove_dir_all_if_exists(path)?;
    ensure_dir(path)
}

/// Copy `src` to `dest`, creating parent directories and replacing any existing file.
///
/// # Errors
/// Returns an error if the parent cannot be created or the copy fails.
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), UtilError> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(src, dest).map_err(|source| io_err(src, source))?;
    Ok(())
}

/// Recursively copy the contents of `src` into `dest`.
///
/// Existing files in `dest` are overwritten; files only present in `dest` are kept.
///
/// # Errors
/// Returns an error if `src` cannot be read or any file cannot be copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<(), UtilError> {
    ensure_dir(dest)?;
    for file in walk_files(src)? {
        let relative = file.strip_prefix(src).unwrap_or(&file);
        copy_file(&file, &dest.join(relative))?;
    }
    Ok(())
}

/// Last modification time of `path`.
///
/// # Errors
/// Returns an error if the metadata cannot be read or the platform has no mtime.
pub fn modified_time(path: &Path) -> Result<SystemTime, UtilError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| io_err(path, source))
}

/// Make `path` absolute by joining it onto the current directory.
///
/// The path is not canonicalized and need not exist.
///
/// # Errors
/// Returns an error if `path` is relative and the current directory cannot be read.
pub fn absolute(path: &Path) -> Result<PathBuf, UtilError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| io_err(Path::new("."), source))?;
    Ok(cwd.join(path))
}

/// Return the user's home directory.
///
/// Resolves via `HOME` (Unix) or `USERPROFILE` (Windows).
///
/// # Errors
/// Returns `UtilError::NoHomeDir` if neither environment variable is set.
pub fn user_home() -> Result<PathBuf, UtilError> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .map_err(|_| UtilError::NoHomeDir)
}

/// Collect every regular file under `dir`, recursively, sorted by path.
///
/// # Errors
/// Returns an error if `dir` or any subdirectory cannot be read.
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, UtilError> {
    let mut files = Vec::new();
    walk_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_files_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), UtilError> {
    let entries = std::fs::read_dir(dir).map_err(|source| io_err(dir, source))?;

    for entry in entries {
        let entry = entry.map_err(|source| io_err(dir, source))?;
        let path = entry.path();

        if path.is_dir() {
            walk_files_recursive(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn reset_dir_wipes_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("staging");
        fs::create_dir_all(dir.join("old")).unwrap();
        fs::write(dir.join("old").join("stale.class"), b"x").unwrap();

        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("fresh");
        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn remove_dir_all_if_exists_absent_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all_if_exists(&tmp.path().join("nonexistent")).unwrap();
    }

    #[test]
    fn copy_file_creates_parent_dirs_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src.class");
        let dest = tmp.path().join("com").join("example").join("Foo.class");
        fs::write(&src, b"new").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"old").unwrap();

        copy_file(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn copy_file_missing_source_names_path() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("missing.class");
        let err = copy_file(&src, &tmp.path().join("out.class"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing.class"), "error was: {err}");
    }

    #[test]
    fn copy_dir_all_mirrors_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("typings");
        fs::create_dir_all(src.join("android")).unwrap();
        fs::write(src.join("android").join("android.d.ts"), b"declare").unwrap();
        fs::write(src.join("README"), b"r").unwrap();

        let dest = tmp.path().join("copy");
        copy_dir_all(&src, &dest).unwrap();
        assert_eq!(
            fs::read(dest.join("android").join("android.d.ts")).unwrap(),
            b"declare"
        );
        assert!(dest.join("README").is_file());
    }

    #[test]
    fn modified_time_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(modified_time(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn walk_files_finds_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("com").join("example");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("b.kt"), b"").unwrap();
        fs::write(sub.join("a.java"), b"").unwrap();
        fs::write(tmp.path().join("c.txt"), b"").unwrap();

        let files = walk_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 3);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn absolute_joins_relative_onto_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute(Path::new("app")).unwrap(), cwd.join("app"));

        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(absolute(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn walk_files_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(walk_files(tmp.path()).unwrap().is_empty());
    }
}
