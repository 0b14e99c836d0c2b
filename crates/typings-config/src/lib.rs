//! Parse `typings.toml` and resolve it into absolute project paths.

pub mod project;
pub mod resolved;

pub use project::{ConfigError, ProjectConfig, CONFIG_FILE};
pub use resolved::{OutputRoots, Overrides, ResolvedConfig};
