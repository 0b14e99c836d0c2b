//! Error types for typings-engine.

use std::path::PathBuf;

use typings_util::process::CommandStatus;

/// Errors produced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A filesystem or process operation failed.
    #[error("{0}")]
    Util(#[from] typings_util::error::UtilError),

    /// An external tool could not be assembled or spawned.
    #[error("{0}")]
    Tool(#[from] typings_tools::ToolError),

    /// A dependency target produced an invalid glob pattern.
    #[error("invalid dependency target `{target}`: {message}")]
    GlobPattern { target: String, message: String },

    /// Reading the operator's selection failed.
    #[error("cannot read selection: {source}")]
    Prompt { source: std::io::Error },

    /// Nothing was requested: no targets, no archives, no local sources.
    #[error("nothing to generate — pass a dependency target, --jar <jar>, --aar <aar>, or --local-source")]
    NoInputsRequested,

    /// Every requested source resolved to nothing.
    #[error("no .jar or .aar file found — specify at least one with --jar <jar> or --aar <aar>, or check the dependency targets")]
    NothingToGenerate,

    /// Local classes could not be packaged.
    #[error("cannot package local sources: {reason}")]
    PackagingFailed { reason: String },

    /// A compiled class was still missing after the one allowed rebuild.
    #[error("no compiled class found for {source_path} even after `{cli} build` — check the native build output")]
    StillStale { source_path: PathBuf, cli: String },

    /// The project CLI exited unsuccessfully.
    #[error("`{cli} {verb} {platform}` failed ({status})")]
    ProjectCliFailed {
        cli: String,
        verb: String,
        platform: String,
        status: CommandStatus,
    },

    /// The generator JAR does not exist even after preparing the platform.
    #[error("declaration generator not found at {path} — run `{cli} prepare android`")]
    GeneratorMissing { path: PathBuf, cli: String },

    /// The declaration generator exited unsuccessfully.
    #[error("declaration generator failed ({status}) for output {output}")]
    GeneratorFailed {
        output: PathBuf,
        status: CommandStatus,
    },
}
