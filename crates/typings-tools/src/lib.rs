//! Invocation of the external tools the typings pipeline drives:
//! the declaration generator, the JAR archiver, and the project CLI.

pub mod detect;
pub mod error;
pub mod invoke;

pub use detect::find_executable;
pub use error::ToolError;
pub use invoke::{ArchiveCommand, BuildVerb, GeneratorCommand, ProjectCommand};
