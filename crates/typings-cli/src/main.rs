#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use typings_config::{Overrides, ResolvedConfig, CONFIG_FILE};
use typings_engine::select::sort_coordinates;
use typings_engine::{
    generate, scan_cache, Collaborators, DtsGenerator, GenerateOptions, JarArchiver, ProjectCli,
    PromptSelector, RuleSelector, ScanOutcome, Selector,
};
use typings_platform::Platform;
use typings_tools::find_executable;
use typings_util::fs::absolute;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(
    name = "typings",
    about = "Generate TypeScript declarations for native Android and iOS APIs"
)]
#[command(version)]
struct Cli {
    /// Log per-file decisions (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate typings for a platform
    Generate(GenerateArgs),
    /// List cached archives matching a dependency target
    Scan {
        /// Dependency target, e.g. `com.example:widget` or `com.example`
        target: String,
        /// Gradle module cache to search instead of the default
        #[arg(long)]
        cache_root: Option<PathBuf>,
        /// Project directory (defaults to the current directory)
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Check tools, cache, and project setup
    Doctor {
        /// Project directory (defaults to the current directory)
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Platform to generate typings for (android or ios)
    platform: Platform,
    /// Gradle dependency targets to look up in the module cache
    targets: Vec<String>,
    /// Extra .jar file to generate typings for (repeatable)
    #[arg(long = "jar", value_name = "JAR")]
    jars: Vec<PathBuf>,
    /// Extra .aar file to generate typings for (repeatable)
    #[arg(long = "aar", value_name = "AAR")]
    aars: Vec<PathBuf>,
    /// Include the project's own Java and Kotlin classes
    #[arg(long)]
    local_source: bool,
    /// Copy the typings directory here when done
    #[arg(long, value_name = "DIR")]
    copy_to: Option<PathBuf>,
    /// Gradle module cache to search instead of the default
    #[arg(long, value_name = "DIR")]
    cache_root: Option<PathBuf>,
    /// How to choose among cached versions
    #[arg(long, value_enum, default_value_t = SelectMode::Prompt)]
    select: SelectMode,
    /// Choices shown per page when prompting
    #[arg(long)]
    page_size: Option<usize>,
    /// iOS declaration filter (not supported yet)
    #[arg(long)]
    filter: Option<String>,
    /// Project directory (defaults to the current directory)
    #[arg(long)]
    project: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SelectMode {
    /// Ask interactively
    Prompt,
    /// Take every cached version
    All,
    /// Take the highest version of each artifact
    Latest,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Scan {
            target,
            cache_root,
            project,
        } => cmd_scan(&target, cache_root, project),
        Command::Doctor { project } => cmd_doctor(project),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

/// Use `project` or the current directory as the project root, made absolute.
///
/// The project CLI runs from inside this directory, so a relative path would
/// be resolved twice by anything it is handed.
fn project_dir(project: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    let dir = match project {
        Some(dir) => absolute(&dir)?,
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(format!("project directory {} does not exist", dir.display()).into());
    }
    Ok(dir)
}

fn load_config(
    project: Option<PathBuf>,
    cache_root: Option<PathBuf>,
) -> Result<ResolvedConfig, Box<dyn Error>> {
    let dir = project_dir(project)?;
    let config = ResolvedConfig::load(&dir, &Overrides { cache_root })?;
    tracing::debug!(
        project = %config.project_dir.display(),
        cache = %config.cache_root.display(),
        "resolved configuration"
    );
    Ok(config)
}

fn selector_for(mode: SelectMode) -> Box<dyn Selector> {
    match mode {
        SelectMode::Prompt => Box::new(PromptSelector::stdio()),
        SelectMode::All => Box::new(RuleSelector::All),
        SelectMode::Latest => Box::new(RuleSelector::Latest),
    }
}

fn cmd_generate(args: GenerateArgs) -> CliResult {
    args.platform.check_host()?;
    let config = load_config(args.project, args.cache_root)?;

    let options = GenerateOptions {
        platform: args.platform,
        targets: args.targets,
        jars: args.jars,
        aars: args.aars,
        local_source: args.local_source,
        copy_to: args.copy_to,
        page_size: args.page_size,
        filter: args.filter,
    };

    let mut selector = selector_for(args.select);
    let mut archiver = JarArchiver::new(&config.jar);
    let mut builder = ProjectCli::from_config(&config);
    let mut generator = DtsGenerator::from_config(&config);

    let report = generate(
        &config,
        &options,
        &mut Collaborators {
            selector: selector.as_mut(),
            archiver: &mut archiver,
            builder: &mut builder,
            generator: &mut generator,
        },
    )?;

    eprintln!("Typings have been generated in the following directory:");
    eprintln!("    {}", report.output_dir.display());
    Ok(())
}

fn cmd_scan(target: &str, cache_root: Option<PathBuf>, project: Option<PathBuf>) -> CliResult {
    let config = load_config(project, cache_root)?;

    match scan_cache(&config.cache_root, target)? {
        ScanOutcome::NoCache { root } => {
            eprintln!("No Gradle cache found at {}", root.display());
        }
        ScanOutcome::NoMatches { target } => {
            eprintln!("No .jar or .aar found for `{target}`");
        }
        ScanOutcome::Found(mut coordinates) => {
            sort_coordinates(&mut coordinates);
            for coordinate in &coordinates {
                println!("{}", coordinate.label());
                println!("    {}", coordinate.absolute_path.display());
            }
            eprintln!("{} archive(s) found", coordinates.len());
        }
    }
    Ok(())
}

fn cmd_doctor(project: Option<PathBuf>) -> CliResult {
    eprintln!("Checking environment...");
    eprintln!();

    let mut issues = 0u32;

    let dir = project_dir(project)?;
    if dir.join(CONFIG_FILE).exists() {
        eprintln!("  [ok] {CONFIG_FILE}: {}", dir.join(CONFIG_FILE).display());
    } else {
        eprintln!("  [--] No {CONFIG_FILE} in {}, using defaults", dir.display());
    }

    let config = match ResolvedConfig::load(&dir, &Overrides::default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  [!!] {e}");
            eprintln!();
            return Err("1 issue(s) found".into());
        }
    };

    for (role, program) in [
        ("java", config.java.as_str()),
        ("jar", config.jar.as_str()),
        ("project CLI", config.project_cli.as_str()),
    ] {
        match find_executable(program) {
            Some(path) => eprintln!("  [ok] {role}: {}", path.display()),
            None => {
                eprintln!("  [!!] {role}: `{program}` not found on PATH");
                issues = issues.saturating_add(1);
            }
        }
    }

    report_path("Gradle cache", &config.cache_root, "no cached dependencies yet");
    report_path(
        "dts-generator",
        &config.generator_jar,
        &format!("will run `{} prepare android` on first use", config.project_cli),
    );

    match Platform::Ios.check_host() {
        Ok(()) => eprintln!("  [ok] ios: host can build iOS typings"),
        Err(e) => eprintln!("  [--] ios: {e}"),
    }

    eprintln!();
    if issues > 0 {
        eprintln!("{issues} issue(s) found — fix them before generating typings");
        Err(format!("{issues} issue(s) found").into())
    } else {
        eprintln!("All checks passed");
        Ok(())
    }
}

/// Report an optional path: present is fine, absent is informational.
fn report_path(name: &str, path: &Path, when_missing: &str) {
    if path.exists() {
        eprintln!("  [ok] {name}: {}", path.display());
    } else {
        eprintln!("  [--] {name}: {} missing, {when_missing}", path.display());
    }
}
