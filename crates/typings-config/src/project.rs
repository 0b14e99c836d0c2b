use serde::Deserialize;
use std::path::{Component, Path};

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "typings.toml";

/// The `typings.toml` project configuration.
///
/// Every field has a default matching the standard NativeScript layout, so the
/// file is optional and may override any subset of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    pub android: AndroidSection,
    pub cache: CacheSection,
    pub tools: ToolsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Native platform projects, relative to the project root.
    pub platforms_dir: String,
    /// Where generated declarations are written, relative to the project root.
    pub typings_dir: String,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            platforms_dir: "platforms".to_owned(),
            typings_dir: "typings".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AndroidSection {
    /// In-project Java/Kotlin sources, relative to the project root.
    pub source_dir: String,
    /// Candidate javac output roots in preference order, relative to the platforms dir.
    pub java_output_roots: Vec<String>,
    /// Candidate kotlinc output roots in preference order, relative to the platforms dir.
    pub kotlin_output_roots: Vec<String>,
    /// Scratch directory for the local classes archive, relative to the platforms dir.
    pub staging_dir: String,
    /// The declaration generator JAR, relative to the platforms dir.
    pub generator_jar: String,
}

impl Default for AndroidSection {
    fn default() -> Self {
        Self {
            source_dir: "App_Resources/Android/src/main/java".to_owned(),
            // Android Gradle Plugin moved javac output between major versions.
            java_output_roots: vec![
                "android/app/build/intermediates/javac/debug/classes".to_owned(),
                "android/app/build/intermediates/javac/debug/compileDebugJavaWithJavac/classes"
                    .to_owned(),
            ],
            kotlin_output_roots: vec!["android/app/build/tmp/kotlin-classes/debug".to_owned()],
            staging_dir: "tmpTypings".to_owned(),
            generator_jar: "android/build-tools/dts-generator.jar".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSection {
    /// Gradle module cache (`files-2.1`) to scan; defaults to the Gradle user home.
    pub root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    /// Project CLI that knows how to `build` and `prepare` native platforms.
    pub project_cli: String,
    /// Java launcher used to run the declaration generator.
    pub java: String,
    /// JAR archiver.
    pub jar: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        let project_cli = if cfg!(windows) { "ns.cmd" } else { "ns" };
        Self {
            project_cli: project_cli.to_owned(),
            java: "java".to_owned(),
            jar: "jar".to_owned(),
        }
    }
}

impl ProjectConfig {
    /// Read `typings.toml` from `project_dir`, or return defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    /// Read and parse a configuration file from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_str(&content, path)
    }

    fn from_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ProjectConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let empty = |key: &str| ConfigError::Invalid {
            path: path.display().to_string(),
            message: format!("{key} must not be empty"),
        };
        if self.android.java_output_roots.is_empty() {
            return Err(empty("android.java_output_roots"));
        }
        if self.android.kotlin_output_roots.is_empty() {
            return Err(empty("android.kotlin_output_roots"));
        }
        if self.android.staging_dir.trim().is_empty() {
            return Err(empty("android.staging_dir"));
        }
        // The staging dir is wiped before every assembly.
        if !is_plain_relative(&self.android.staging_dir) {
            return Err(ConfigError::Invalid {
                path: path.display().to_string(),
                message: format!(
                    "android.staging_dir must be a relative path below the platforms dir, got `{}`",
                    self.android.staging_dir
                ),
            });
        }
        Ok(())
    }
}

/// True if `value` only has normal components, e.g. `tmp/typings` but not `../x` or `/x`.
fn is_plain_relative(value: &str) -> bool {
    let mut components = Path::new(value).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid typings.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid typings.toml at {path}: {message}")]
    Invalid { path: String, message: String },
    #[error("{0}")]
    Util(#[from] typings_util::error::UtilError),
}
