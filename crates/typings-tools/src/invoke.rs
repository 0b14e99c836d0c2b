//! Builders for external tool invocations.
//!
//! Each builder validates its inputs in `build_args` and runs the tool with
//! inherited stdio in `execute`, reporting only the exit status. Paths are
//! passed through as `OsString`s so non-UTF-8 names reach the tool intact.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use typings_util::process::{run_status, CommandStatus};

use crate::error::ToolError;

/// Builder for `java -jar dts-generator.jar -input <files…> -output <dir>`.
#[derive(Debug, Default)]
pub struct GeneratorCommand {
    java: Option<String>,
    generator_jar: Option<PathBuf>,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
}

impl GeneratorCommand {
    /// Create a new empty command builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Java launcher (defaults to `java`).
    pub fn java(mut self, java: &str) -> Self {
        self.java = Some(java.to_owned());
        self
    }

    /// Set the generator JAR to run.
    pub fn generator_jar(mut self, path: &Path) -> Self {
        self.generator_jar = Some(path.to_path_buf());
        self
    }

    /// Set the archives and source roots to generate declarations for.
    pub fn inputs(mut self, paths: &[PathBuf]) -> Self {
        self.inputs = paths.to_vec();
        self
    }

    /// Set the directory declarations are written to.
    pub fn output(mut self, path: &Path) -> Self {
        self.output = Some(path.to_path_buf());
        self
    }

    fn program(&self) -> &str {
        self.java.as_deref().unwrap_or("java")
    }

    /// Build the argument list without executing.
    ///
    /// # Errors
    /// Returns an error if the generator JAR, inputs, or output directory are not set.
    pub fn build_args(&self) -> Result<Vec<OsString>, ToolError> {
        let Some(jar) = &self.generator_jar else {
            return Err(ToolError::NoGeneratorJar);
        };
        if self.inputs.is_empty() {
            return Err(ToolError::NoInputs);
        }
        let Some(output) = &self.output else {
            return Err(ToolError::NoOutput {
                tool: "dts-generator".to_owned(),
            });
        };

        let mut args = vec![OsString::from("-jar"), jar.into()];
        args.push("-input".into());
        args.extend(self.inputs.iter().map(OsString::from));
        args.push("-output".into());
        args.push(output.into());
        Ok(args)
    }

    /// Run the generator.
    ///
    /// # Errors
    /// Returns an error if the command is incomplete or `java` cannot be spawned.
    pub fn execute(&self) -> Result<CommandStatus, ToolError> {
        let args = self.build_args()?;
        tracing::debug!(program = self.program(), ?args, "running declaration generator");
        Ok(run_status(Command::new(self.program()).args(&args))?)
    }
}

/// Builder for `jar cf <archive> -C <dir> .`.
#[derive(Debug, Default)]
pub struct ArchiveCommand {
    jar: Option<String>,
    archive: Option<PathBuf>,
    source_dir: Option<PathBuf>,
}

impl ArchiveCommand {
    /// Create a new empty command builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archiver binary (defaults to `jar`).
    pub fn jar(mut self, jar: &str) -> Self {
        self.jar = Some(jar.to_owned());
        self
    }

    /// Set the archive file to create.
    pub fn archive(mut self, path: &Path) -> Self {
        self.archive = Some(path.to_path_buf());
        self
    }

    /// Set the directory whose contents go into the archive.
    pub fn source_dir(mut self, path: &Path) -> Self {
        self.source_dir = Some(path.to_path_buf());
        self
    }

    fn program(&self) -> &str {
        self.jar.as_deref().unwrap_or("jar")
    }

    /// Build the argument list without executing.
    ///
    /// # Errors
    /// Returns an error if the archive path or source directory is not set.
    pub fn build_args(&self) -> Result<Vec<OsString>, ToolError> {
        let Some(archive) = &self.archive else {
            return Err(ToolError::NoOutput {
                tool: self.program().to_owned(),
            });
        };
        let Some(dir) = &self.source_dir else {
            return Err(ToolError::NoSourceDir {
                tool: self.program().to_owned(),
            });
        };
        Ok(vec![
            "cf".into(),
            archive.into(),
            "-C".into(),
            dir.into(),
            ".".into(),
        ])
    }

    /// Run the archiver.
    ///
    /// # Errors
    /// Returns an error if the command is incomplete or the archiver cannot be spawned.
    pub fn execute(&self) -> Result<CommandStatus, ToolError> {
        let args = self.build_args()?;
        tracing::debug!(program = self.program(), ?args, "running archiver");
        Ok(run_status(Command::new(self.program()).args(&args))?)
    }
}

/// What the project CLI is asked to do with a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVerb {
    /// Full native build; produces compiled classes.
    Build,
    /// Generate the native project only; enough to obtain the generator JAR.
    Prepare,
}

impl BuildVerb {
    /// The subcommand passed to the project CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildVerb::Build => "build",
            BuildVerb::Prepare => "prepare",
        }
    }
}

impl fmt::Display for BuildVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for `<cli> <verb> <platform>`, e.g. `ns build android`.
#[derive(Debug)]
pub struct ProjectCommand {
    cli: String,
    verb: BuildVerb,
    platform: Option<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, PathBuf)>,
}

impl ProjectCommand {
    /// Create a builder for the given project CLI and verb.
    pub fn new(cli: &str, verb: BuildVerb) -> Self {
        Self {
            cli: cli.to_owned(),
            verb,
            platform: None,
            working_dir: None,
            env: Vec::new(),
        }
    }

    /// Set the platform to build.
    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_owned());
        self
    }

    /// Run the CLI from this directory (the project root).
    pub fn working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Add an environment variable holding a path.
    pub fn env(mut self, key: &str, value: &Path) -> Self {
        self.env.push((key.to_owned(), value.to_path_buf()));
        self
    }

    /// Build the argument list without executing.
    ///
    /// # Errors
    /// Returns an error if no platform is set.
    pub fn build_args(&self) -> Result<Vec<String>, ToolError> {
        let Some(platform) = &self.platform else {
            return Err(ToolError::NoPlatform {
                tool: self.cli.clone(),
            });
        };
        Ok(vec![self.verb.as_str().to_owned(), platform.clone()])
    }

    /// Run the project CLI.
    ///
    /// # Errors
    /// Returns an error if no platform is set or the CLI cannot be spawned.
    pub fn execute(&self) -> Result<CommandStatus, ToolError> {
        let args = self.build_args()?;
        let mut cmd = Command::new(&self.cli);
        cmd.args(&args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        tracing::debug!(program = %self.cli, ?args, "running project CLI");
        Ok(run_status(&mut cmd)?)
    }
}
