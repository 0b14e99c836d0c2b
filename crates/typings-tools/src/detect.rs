//! Locating external tools before the pipeline depends on them.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve `program` to an executable file.
///
/// A name containing a path separator is checked as-is; a bare name is looked up
/// in every directory of `PATH` (with `.exe`/`.cmd` suffixes on Windows).
pub fn find_executable(program: &str) -> Option<PathBuf> {
    find_in(program, std::env::var_os("PATH").as_deref())
}

fn find_in(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return is_executable(as_path).then(|| as_path.to_path_buf());
    }

    let dirs = path_var?;
    std::env::split_paths(dirs).find_map(|dir| {
        candidate_names(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|candidate| is_executable(candidate))
    })
}

fn candidate_names(program: &str) -> Vec<String> {
    if cfg!(windows) && Path::new(program).extension().is_none() {
        vec![
            program.to_owned(),
            format!("{program}.exe"),
            format!("{program}.cmd"),
        ]
    } else {
        vec![program.to_owned()]
    }
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_shell_on_path() {
        assert!(find_executable("sh").is_some());
    }

    #[test]
    fn missing_program_is_none() {
        assert!(find_executable("nonexistent_binary_xyz_123").is_none());
    }

    #[test]
    fn no_path_variable_is_none() {
        assert!(find_in("sh", None).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn explicit_path_checks_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let tool = tmp.path().join("tool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_executable(&tool.display().to_string()).is_none());

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_executable(&tool.display().to_string()), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn searches_given_path_dirs_in_order() {
        use std::os::unix::fs::PermissionsExt;

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [first.path(), second.path()] {
            let tool = dir.join("ns");
            std::fs::write(&tool, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            find_in("ns", Some(&path_var)),
            Some(first.path().join("ns"))
        );
    }
}
