//! The generate pipeline: resolve inputs, rebuild at most once, run the generator.

use std::path::{Path, PathBuf};

use typings_config::ResolvedConfig;
use typings_platform::Platform;
use typings_tools::BuildVerb;
use typings_util::fs::{copy_dir_all, ensure_dir};
use typings_util::process::CommandStatus;

use crate::collect::collect_sources;
use crate::error::EngineError;
use crate::freshness::FreshnessCheck;
use crate::package::{assemble, Archiver, PackagingOutcome};
use crate::prompt::default_page_size;
use crate::scan::{scan_cache, ScanOutcome};
use crate::select::{select_dependencies, Selector};

/// Environment variable telling an iOS build where to write declarations.
pub const DECLARATIONS_PATH_ENV: &str = "TNS_TYPESCRIPT_DECLARATIONS_PATH";

/// Runs the project CLI for a platform.
pub trait ProjectBuilder {
    /// Run `<cli> <verb> <platform>` with extra environment variables.
    ///
    /// # Errors
    /// Returns an error if the CLI cannot be started.
    fn run(
        &mut self,
        verb: BuildVerb,
        platform: Platform,
        env: &[(&str, &Path)],
    ) -> Result<CommandStatus, EngineError>;
}

/// Produces TypeScript declarations from archives.
pub trait DeclarationGenerator {
    /// Generate declarations for `inputs` into `output`.
    ///
    /// # Errors
    /// Returns an error if the generator cannot be started.
    fn generate(&mut self, inputs: &[PathBuf], output: &Path)
        -> Result<CommandStatus, EngineError>;
}

/// Everything the pipeline delegates to.
pub struct Collaborators<'a> {
    pub selector: &'a mut dyn Selector,
    pub archiver: &'a mut dyn Archiver,
    pub builder: &'a mut dyn ProjectBuilder,
    pub generator: &'a mut dyn DeclarationGenerator,
}

/// What to generate typings for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub platform: Platform,
    /// `group:artifact` fragments looked up in the Gradle cache.
    pub targets: Vec<String>,
    pub jars: Vec<PathBuf>,
    pub aars: Vec<PathBuf>,
    /// Package the project's own compiled Java/Kotlin classes.
    pub local_source: bool,
    /// Copy the whole typings directory here afterwards.
    pub copy_to: Option<PathBuf>,
    /// Selection page size; derived from the terminal when unset.
    pub page_size: Option<usize>,
    /// iOS declaration filter. Not supported; only warned about.
    pub filter: Option<String>,
}

impl GenerateOptions {
    /// Options for `platform` with no inputs, no copy and default paging.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            targets: Vec::new(),
            jars: Vec::new(),
            aars: Vec::new(),
            local_source: false,
            copy_to: None,
            page_size: None,
            filter: None,
        }
    }

    fn has_manual_inputs(&self) -> bool {
        !self.jars.is_empty() || !self.aars.is_empty()
    }

    /// Reject option combinations that cannot produce anything.
    ///
    /// # Errors
    /// Returns [`EngineError::NoInputsRequested`] for an Android run with no
    /// targets, no archives and no local sources.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self.platform {
            Platform::Android
                if self.targets.is_empty() && !self.has_manual_inputs() && !self.local_source =>
            {
                Err(EngineError::NoInputsRequested)
            }
            _ => Ok(()),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Where the typings can be found: the copy destination if one was given.
    pub output_dir: PathBuf,
    /// Archives passed to the generator, in order. Empty for iOS.
    pub inputs: Vec<PathBuf>,
}

/// Generate typings for `options.platform`.
///
/// Options are validated before any filesystem work or subprocess.
///
/// # Errors
/// Returns an error on invalid options, when nothing could be resolved, or when
/// packaging, the project CLI, or the generator fails.
pub fn generate(
    config: &ResolvedConfig,
    options: &GenerateOptions,
    collab: &mut Collaborators<'_>,
) -> Result<GenerateReport, EngineError> {
    options.validate()?;

    let inputs = match options.platform {
        Platform::Android => generate_android(config, options, collab)?,
        Platform::Ios => {
            generate_ios(config, options, collab)?;
            Vec::new()
        }
    };

    let output_dir = match &options.copy_to {
        Some(dest) => {
            copy_dir_all(&config.typings_dir, dest)?;
            tracing::info!(dest = %dest.display(), "copied typings");
            dest.clone()
        }
        None => config.typings_dir.clone(),
    };

    Ok(GenerateReport { output_dir, inputs })
}

fn generate_android(
    config: &ResolvedConfig,
    options: &GenerateOptions,
    collab: &mut Collaborators<'_>,
) -> Result<Vec<PathBuf>, EngineError> {
    if options.filter.is_some() {
        tracing::warn!("--filter only applies to iOS and is ignored for android");
    }

    let page_size = options.page_size.unwrap_or_else(default_page_size);
    let mut resolved = Vec::new();
    for target in &options.targets {
        match resolve_target(config, target, &mut *collab.selector, page_size) {
            Ok(paths) => resolved.extend(paths),
            Err(e) => tracing::warn!("skipping dependency `{target}`: {e}"),
        }
    }

    let mut pending_rebuild = None;
    if options.local_source {
        match package_local(config, FreshnessCheck::Timestamps, &mut *collab.archiver)? {
            Some(PackagingOutcome::Packaged { archive_path }) => resolved.push(archive_path),
            Some(PackagingOutcome::RebuildRequired { source }) => {
                tracing::info!(source = %source.display(), "compiled classes are out of date");
                pending_rebuild = Some(source);
            }
            Some(PackagingOutcome::Failed { reason, .. }) => {
                return Err(EngineError::PackagingFailed { reason })
            }
            None => tracing::warn!(
                "no Java or Kotlin sources found in {}",
                config.source_dir.display()
            ),
        }
    }

    if resolved.is_empty() && pending_rebuild.is_none() && !options.has_manual_inputs() {
        return Err(EngineError::NothingToGenerate);
    }

    let output = config.typings_dir.join(Platform::Android.as_str());
    ensure_dir(&output)?;

    let generator_missing = !config.generator_jar.is_file();
    if generator_missing || pending_rebuild.is_some() {
        let verb = if pending_rebuild.is_some() {
            BuildVerb::Build
        } else {
            BuildVerb::Prepare
        };
        run_project(config, &mut *collab.builder, verb, Platform::Android, &[])?;
    }

    if let Some(stale) = pending_rebuild {
        match package_local(config, FreshnessCheck::ExistenceOnly, &mut *collab.archiver)? {
            Some(PackagingOutcome::Packaged { archive_path }) => resolved.push(archive_path),
            Some(PackagingOutcome::RebuildRequired { source }) => {
                return Err(EngineError::StillStale {
                    source_path: source,
                    cli: config.project_cli.clone(),
                })
            }
            Some(PackagingOutcome::Failed { reason, .. }) => {
                return Err(EngineError::PackagingFailed { reason })
            }
            None => {
                return Err(EngineError::StillStale {
                    source_path: stale,
                    cli: config.project_cli.clone(),
                })
            }
        }
    }

    if !config.generator_jar.is_file() {
        return Err(EngineError::GeneratorMissing {
            path: config.generator_jar.clone(),
            cli: config.project_cli.clone(),
        });
    }

    let inputs: Vec<PathBuf> = options
        .jars
        .iter()
        .chain(&options.aars)
        .cloned()
        .chain(resolved)
        .collect();
    if inputs.is_empty() {
        return Err(EngineError::NothingToGenerate);
    }

    tracing::info!(
        inputs = inputs.len(),
        output = %output.display(),
        "generating android typings"
    );
    let status = collab.generator.generate(&inputs, &output)?;
    if !status.success {
        return Err(EngineError::GeneratorFailed { output, status });
    }
    Ok(inputs)
}

fn generate_ios(
    config: &ResolvedConfig,
    options: &GenerateOptions,
    collab: &mut Collaborators<'_>,
) -> Result<(), EngineError> {
    if let Some(filter) = &options.filter {
        tracing::warn!("--filter `{filter}` is not supported yet and is ignored");
    }
    if !options.targets.is_empty() || options.has_manual_inputs() || options.local_source {
        tracing::warn!("dependency targets, --jar, --aar and --local-source apply to android only");
    }

    let output = config.typings_dir.join(Platform::Ios.as_str());
    ensure_dir(&output)?;
    tracing::info!(output = %output.display(), "generating ios typings");
    run_project(
        config,
        &mut *collab.builder,
        BuildVerb::Build,
        Platform::Ios,
        &[(DECLARATIONS_PATH_ENV, output.as_path())],
    )
}

/// Scan the cache for `target` and let the selector choose among the matches.
fn resolve_target(
    config: &ResolvedConfig,
    target: &str,
    selector: &mut dyn Selector,
    page_size: usize,
) -> Result<Vec<PathBuf>, EngineError> {
    match scan_cache(&config.cache_root, target)? {
        ScanOutcome::NoCache { root } => {
            tracing::warn!("no Gradle cache found at {}", root.display());
            Ok(Vec::new())
        }
        ScanOutcome::NoMatches { target } => {
            tracing::warn!("no .jar or .aar found in the Gradle cache for `{target}`");
            Ok(Vec::new())
        }
        ScanOutcome::Found(coordinates) => {
            select_dependencies(target, coordinates, selector, page_size)
        }
    }
}

/// Collect local sources and assemble them. `None` when there are no sources.
fn package_local(
    config: &ResolvedConfig,
    check: FreshnessCheck,
    archiver: &mut dyn Archiver,
) -> Result<Option<PackagingOutcome>, EngineError> {
    let mut set = collect_sources(&config.source_dir, &config.output_roots)?;
    if !set.has_entries() {
        return Ok(None);
    }
    tracing::info!(sources = set.len(), ?check, "packaging local classes");
    Ok(Some(assemble(&config.staging_dir, &mut set, check, archiver)))
}

fn run_project(
    config: &ResolvedConfig,
    builder: &mut dyn ProjectBuilder,
    verb: BuildVerb,
    platform: Platform,
    env: &[(&str, &Path)],
) -> Result<(), EngineError> {
    tracing::info!("running `{} {verb} {platform}`", config.project_cli);
    let status = builder.run(verb, platform, env)?;
    if !status.success {
        return Err(EngineError::ProjectCliFailed {
            cli: config.project_cli.clone(),
            verb: verb.to_string(),
            platform: platform.to_string(),
            status,
        });
    }
    Ok(())
}
