//! Error types for typings-util.

/// Errors produced by utility functions.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// An I/O operation failed.
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A command could not be spawned.
    #[error("cannot execute `{program}`: {source}")]
    CommandExec {
        program: String,
        source: std::io::Error,
    },

    /// A cache-relative path does not follow `group/artifact/version/hash/file`.
    #[error("malformed cache entry {path}: expected 5 path segments (group/artifact/version/hash/file), got {segments}")]
    MalformedCachePath { path: String, segments: usize },

    /// Cannot determine the user's home directory.
    #[error("cannot determine home directory — set the HOME environment variable")]
    NoHomeDir,
}
