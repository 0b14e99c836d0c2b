//! Dependency coordinates recovered from the Gradle module cache layout.
//!
//! The cache stores every downloaded artifact at
//! `<root>/<group>/<artifact>/<version>/<content-hash>/<file>`.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::UtilError;

/// File extensions of archives the declaration generator accepts.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["jar", "aar"];

/// Number of path segments in a cache entry relative to the cache root.
const CACHE_SEGMENTS: usize = 5;

/// One cached compiled dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCoordinate {
    /// Group identifier, e.g. `"com.squareup.okhttp3"`.
    pub group: String,
    /// Artifact identifier, e.g. `"okhttp"`.
    pub artifact: String,
    /// Version directory, e.g. `"4.12.0"`.
    pub version: String,
    /// Content hash directory Gradle files the archive under.
    pub content_hash: String,
    /// Archive file name, e.g. `"okhttp-4.12.0.jar"`.
    pub file_name: String,
    /// Absolute location of the archive on disk.
    pub absolute_path: PathBuf,
}

impl DependencyCoordinate {
    /// Parse a cache entry given as a path relative to `cache_root`.
    ///
    /// # Errors
    /// Returns `UtilError::MalformedCachePath` when `relative` does not consist of
    /// exactly five plain UTF-8 segments.
    pub fn from_cache_path(cache_root: &Path, relative: &Path) -> Result<Self, UtilError> {
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let component_count = relative.components().count();

        let malformed = || UtilError::MalformedCachePath {
            path: relative.display().to_string(),
            segments: component_count,
        };

        if segments.len() != CACHE_SEGMENTS || component_count != CACHE_SEGMENTS {
            return Err(malformed());
        }

        let [group, artifact, version, content_hash, file_name] = segments.as_slice() else {
            return Err(malformed());
        };

        Ok(Self {
            group: (*group).to_owned(),
            artifact: (*artifact).to_owned(),
            version: (*version).to_owned(),
            content_hash: (*content_hash).to_owned(),
            file_name: (*file_name).to_owned(),
            absolute_path: cache_root.join(relative),
        })
    }

    /// Key used to round-trip a coordinate through a selection prompt.
    pub fn identity_key(&self) -> String {
        format!("{}{}", self.content_hash, self.version)
    }

    /// The `group:artifact:version` triple.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }

    /// Human-readable label: `group:artifact:version - file`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.gav(), self.file_name)
    }

    /// The cache-relative path this coordinate was parsed from.
    pub fn relative_path(&self) -> PathBuf {
        [
            &self.group,
            &self.artifact,
            &self.version,
            &self.content_hash,
            &self.file_name,
        ]
        .iter()
        .collect()
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Whether `path` ends in one of [`ARCHIVE_EXTENSIONS`].
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ARCHIVE_EXTENSIONS.contains(&e))
}
