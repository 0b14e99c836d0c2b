//! Error types for typings-tools.

/// Errors produced while assembling or running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The generator was asked to run without any input archives.
    #[error("no generator inputs specified — pass at least one .jar or .aar")]
    NoInputs,

    /// The generator JAR location was not set.
    #[error("no declaration generator JAR specified")]
    NoGeneratorJar,

    /// No output path was set on a command that writes one.
    #[error("no output path specified for `{tool}`")]
    NoOutput { tool: String },

    /// No source directory was set on an archive command.
    #[error("no source directory specified for `{tool}`")]
    NoSourceDir { tool: String },

    /// The project CLI was invoked without a platform.
    #[error("no platform specified for `{tool}`")]
    NoPlatform { tool: String },

    /// An error propagated from typings-util (typically a spawn failure).
    #[error("{0}")]
    Util(#[from] typings_util::error::UtilError),
}
