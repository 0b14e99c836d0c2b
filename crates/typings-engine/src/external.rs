//! Collaborators backed by real external processes.

use std::path::{Path, PathBuf};

use typings_config::ResolvedConfig;
use typings_platform::Platform;
use typings_tools::{ArchiveCommand, BuildVerb, GeneratorCommand, ProjectCommand};
use typings_util::process::CommandStatus;

use crate::error::EngineError;
use crate::package::Archiver;
use crate::pipeline::{DeclarationGenerator, ProjectBuilder};

/// Archives with the JDK `jar` tool.
#[derive(Debug, Clone)]
pub struct JarArchiver {
    jar: String,
}

impl JarArchiver {
    /// Archive with the `jar` executable named or located at `jar`.
    pub fn new(jar: &str) -> Self {
        Self {
            jar: jar.to_owned(),
        }
    }
}

impl Archiver for JarArchiver {
    fn archive(
        &mut self,
        archive: &Path,
        source_dir: &Path,
    ) -> Result<CommandStatus, EngineError> {
        Ok(ArchiveCommand::new()
            .jar(&self.jar)
            .archive(archive)
            .source_dir(source_dir)
            .execute()?)
    }
}

/// Runs the project CLI (`ns` by default) from the project root.
#[derive(Debug, Clone)]
pub struct ProjectCli {
    cli: String,
    project_dir: PathBuf,
}

impl ProjectCli {
    /// Run `cli` with `project_dir` as its working directory.
    pub fn new(cli: &str, project_dir: &Path) -> Self {
        Self {
            cli: cli.to_owned(),
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Use the configured project CLI and project root.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(&config.project_cli, &config.project_dir)
    }
}

impl ProjectBuilder for ProjectCli {
    fn run(
        &mut self,
        verb: BuildVerb,
        platform: Platform,
        env: &[(&str, &Path)],
    ) -> Result<CommandStatus, EngineError> {
        let cmd = env.iter().fold(
            ProjectCommand::new(&self.cli, verb)
                .platform(platform.as_str())
                .working_dir(&self.project_dir),
            |cmd, (key, value)| cmd.env(key, value),
        );
        Ok(cmd.execute()?)
    }
}

/// Runs the declaration generator JAR with `java -jar`.
#[derive(Debug, Clone)]
pub struct DtsGenerator {
    java: String,
    generator_jar: PathBuf,
}

impl DtsGenerator {
    /// Launch `generator_jar` with the `java` executable.
    pub fn new(java: &str, generator_jar: &Path) -> Self {
        Self {
            java: java.to_owned(),
            generator_jar: generator_jar.to_path_buf(),
        }
    }

    /// Use the configured Java launcher and generator JAR.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(&config.java, &config.generator_jar)
    }
}

impl DeclarationGenerator for DtsGenerator {
    fn generate(
        &mut self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<CommandStatus, EngineError> {
        Ok(GeneratorCommand::new()
            .java(&self.java)
            .generator_jar(&self.generator_jar)
            .inputs(inputs)
            .output(output)
            .execute()?)
    }
}
