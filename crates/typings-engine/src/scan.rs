//! Gradle module cache scanning.

use std::path::{Path, PathBuf};

use typings_util::coordinate::{is_archive, DependencyCoordinate, ARCHIVE_EXTENSIONS};

use crate::error::EngineError;

/// Result of scanning the cache for one dependency target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The cache root does not exist; nothing was scanned.
    NoCache { root: PathBuf },
    /// The cache exists but nothing matched the target.
    NoMatches { target: String },
    /// Matching archives, sorted by their cache-relative path.
    Found(Vec<DependencyCoordinate>),
}

/// Cache-relative glob patterns for a `group:artifact` target fragment.
///
/// `com.example:widget` becomes `com.example/widget/**/*.jar` and `…/*.aar`.
pub fn target_patterns(target: &str) -> Vec<String> {
    let prefix = target.trim().trim_end_matches([':', '/']).replace(':', "/");
    ARCHIVE_EXTENSIONS
        .iter()
        .map(|ext| {
            if prefix.is_empty() {
                format!("**/*.{ext}")
            } else {
                format!("{prefix}/**/*.{ext}")
            }
        })
        .collect()
}

/// Find every cached archive matching `target` under `cache_root`.
///
/// Entries that do not follow the five-segment cache layout are skipped with a warning.
///
/// # Errors
/// Returns an error if `target` does not form a valid glob pattern.
pub fn scan_cache(cache_root: &Path, target: &str) -> Result<ScanOutcome, EngineError> {
    if !cache_root.is_dir() {
        return Ok(ScanOutcome::NoCache {
            root: cache_root.to_path_buf(),
        });
    }

    let escaped_root = glob::Pattern::escape(&cache_root.display().to_string());
    let mut relative_paths = Vec::new();

    for pattern in target_patterns(target) {
        let full_pattern = format!("{escaped_root}/{pattern}");
        let matches = glob::glob(&full_pattern).map_err(|e| EngineError::GlobPattern {
            target: target.to_owned(),
            message: e.to_string(),
        })?;

        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable cache entry");
                    continue;
                }
            };
            if !path.is_file() || !is_archive(&path) {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(cache_root) {
                relative_paths.push(relative.to_path_buf());
            }
        }
    }

    relative_paths.sort();
    relative_paths.dedup();

    let coordinates: Vec<DependencyCoordinate> = relative_paths
        .iter()
        .filter_map(
            |relative| match DependencyCoordinate::from_cache_path(cache_root, relative) {
                Ok(coordinate) => Some(coordinate),
                Err(e) => {
                    tracing::warn!("skipping cache entry: {e}");
                    None
                }
            },
        )
        .collect();

    if coordinates.is_empty() {
        return Ok(ScanOutcome::NoMatches {
            target: target.to_owned(),
        });
    }

    tracing::debug!(dependency = target, count = coordinates.len(), "cache scan complete");
    Ok(ScanOutcome::Found(coordinates))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod tests {
    use std::fs;

    use super::*;

    /// Create `<root>/<relative>` with placeholder content.
    pub(crate) fn cache_file(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"PK").unwrap();
        path
    }

    fn found(outcome: ScanOutcome) -> Vec<DependencyCoordinate> {
        match outcome {
            ScanOutcome::Found(coords) => coords,
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn patterns_replace_separators() {
        assert_eq!(
            target_patterns("com.example:widget"),
            vec!["com.example/widget/**/*.jar", "com.example/widget/**/*.aar"]
        );
    }

    #[test]
    fn patterns_for_group_only() {
        assert_eq!(
            target_patterns("com.example:"),
            vec!["com.example/**/*.jar", "com.example/**/*.aar"]
        );
    }

    #[test]
    fn missing_root_is_no_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("files-2.1");
        let outcome = scan_cache(&root, "com.example:widget").unwrap();
        assert_eq!(outcome, ScanOutcome::NoCache { root });
    }

    #[test]
    fn no_matching_files_is_no_matches() {
        let tmp = tempfile::tempdir().unwrap();
        cache_file(tmp.path(), "com.other/thing/1.0/aa/thing-1.0.jar");
        let outcome = scan_cache(tmp.path(), "com.example:widget").unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::NoMatches {
                target: "com.example:widget".to_owned()
            }
        );
    }

    #[test]
    fn finds_jars_and_aars() {
        let tmp = tempfile::tempdir().unwrap();
        cache_file(tmp.path(), "com.example/widget/1.0/abc123/widget-1.0.aar");
        cache_file(tmp.path(), "com.example/widget/2.0/def456/widget-2.0.jar");
        cache_file(tmp.path(), "com.example/widget/2.0/fff000/widget-2.0.pom");

        let coords = found(scan_cache(tmp.path(), "com.example:widget").unwrap());
        assert_eq!(coords.len(), 2);
        let first = coords.first().unwrap();
        assert_eq!(first.version, "1.0");
        assert_eq!(first.content_hash, "abc123");
        assert_eq!(
            first.absolute_path,
            tmp.path().join("com.example/widget/1.0/abc123/widget-1.0.aar")
        );
    }

    #[test]
    fn partial_target_matches_whole_group() {
        let tmp = tempfile::tempdir().unwrap();
        cache_file(tmp.path(), "com.example/widget/1.0/aa/widget-1.0.jar");
        cache_file(tmp.path(), "com.example/gadget/3.1/bb/gadget-3.1.aar");
        cache_file(tmp.path(), "org.other/widget/1.0/cc/widget-1.0.jar");

        let coords = found(scan_cache(tmp.path(), "com.example").unwrap());
        let artifacts: Vec<&str> = coords.iter().map(|c| c.artifact.as_str()).collect();
        assert_eq!(artifacts, vec!["gadget", "widget"]);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        cache_file(tmp.path(), "com.example/widget/1.0/aa/widget-1.0.jar");
        cache_file(tmp.path(), "com.example/widget/stray.jar");
        cache_file(tmp.path(), "com.example/widget/1.0/aa/nested/extra.jar");

        let coords = found(scan_cache(tmp.path(), "com.example:widget").unwrap());
        assert_eq!(coords.len(), 1);
        assert_eq!(coords.first().unwrap().file_name, "widget-1.0.jar");
    }

    #[test]
    fn only_malformed_entries_is_no_matches() {
        let tmp = tempfile::tempdir().unwrap();
        cache_file(tmp.path(), "com.example/widget/stray.jar");
        let outcome = scan_cache(tmp.path(), "com.example:widget").unwrap();
        assert!(matches!(outcome, ScanOutcome::NoMatches { .. }));
    }

    #[test]
    fn invalid_pattern_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan_cache(tmp.path(), "com.example:[widget")
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid dependency target"), "error was: {err}");
    }

    #[test]
    fn scan_is_read_only() {
        let tmp = tempfile::tempdir().unwrap();
        let file = cache_file(tmp.path(), "com.example/widget/1.0/aa/widget-1.0.jar");
        let before = fs::metadata(&file).unwrap().modified().unwrap();
        scan_cache(tmp.path(), "com.example:widget").unwrap();
        assert_eq!(fs::metadata(&file).unwrap().modified().unwrap(), before);
        assert_eq!(fs::read(&file).unwrap(), b"PK");
    }
}
