//! Absolute paths and tool names for one pipeline run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use typings_util::fs::absolute;

use crate::project::{ConfigError, ProjectConfig};

/// Gradle's module cache, relative to the Gradle user home.
const GRADLE_FILES_CACHE: &str = "caches/modules-2/files-2.1";

/// Ordered candidate output roots for each source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoots {
    pub java: Vec<PathBuf>,
    pub kotlin: Vec<PathBuf>,
}

/// Command-line values that take precedence over `typings.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cache_root: Option<PathBuf>,
}

/// Configuration with every path made absolute. Built once at startup.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub project_dir: PathBuf,
    pub platforms_dir: PathBuf,
    pub typings_dir: PathBuf,
    pub source_dir: PathBuf,
    pub output_roots: OutputRoots,
    pub staging_dir: PathBuf,
    pub generator_jar: PathBuf,
    pub cache_root: PathBuf,
    pub project_cli: String,
    pub java: String,
    pub jar: String,
}

impl ResolvedConfig {
    /// Load `typings.toml` from `project_dir` and resolve it against the process environment.
    ///
    /// Relative `project_dir` and cache override paths are taken from the current directory.
    ///
    /// # Errors
    /// Returns an error if the configuration file is invalid or no cache root can be
    /// determined (no override, no `GRADLE_USER_HOME`, and no home directory).
    pub fn load(project_dir: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
        let project_dir = absolute(project_dir)?;
        let config = ProjectConfig::load(&project_dir)?;
        let cache_root = match (&overrides.cache_root, &config.cache.root) {
            (Some(root), _) => absolute(root)?,
            (None, Some(root)) => project_dir.join(root),
            (None, None) => {
                absolute(&default_cache_root(std::env::var_os("GRADLE_USER_HOME"))?)?
            }
        };
        Ok(Self::from_config(&project_dir, &config, cache_root))
    }

    /// Resolve `config` relative to `project_dir` with an already-known cache root.
    ///
    /// `project_dir` is expected to be absolute already.
    pub fn from_config(project_dir: &Path, config: &ProjectConfig, cache_root: PathBuf) -> Self {
        let platforms_dir = project_dir.join(&config.project.platforms_dir);
        let under_platforms =
            |roots: &[String]| roots.iter().map(|r| platforms_dir.join(r)).collect::<Vec<_>>();

        Self {
            project_dir: project_dir.to_path_buf(),
            typings_dir: project_dir.join(&config.project.typings_dir),
            source_dir: project_dir.join(&config.android.source_dir),
            output_roots: OutputRoots {
                java: under_platforms(&config.android.java_output_roots),
                kotlin: under_platforms(&config.android.kotlin_output_roots),
            },
            staging_dir: platforms_dir.join(&config.android.staging_dir),
            generator_jar: platforms_dir.join(&config.android.generator_jar),
            platforms_dir,
            cache_root,
            project_cli: config.tools.project_cli.clone(),
            java: config.tools.java.clone(),
            jar: config.tools.jar.clone(),
        }
    }
}

/// Gradle module cache under `$GRADLE_USER_HOME`, falling back to `~/.gradle`.
///
/// # Errors
/// Returns an error if `gradle_user_home` is unset and the home directory is unknown.
pub fn default_cache_root(gradle_user_home: Option<OsString>) -> Result<PathBuf, ConfigError> {
    let gradle_home = match gradle_user_home {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => typings_util::fs::user_home()?.join(".gradle"),
    };
    Ok(gradle_home.join(GRADLE_FILES_CACHE))
}
