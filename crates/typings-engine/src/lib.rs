//! Artifact resolution, freshness checks, and packaging for declaration generation.

pub mod collect;
pub mod error;
pub mod external;
pub mod freshness;
pub mod package;
pub mod pipeline;
pub mod prompt;
pub mod scan;
pub mod select;

pub use collect::{collect_sources, CandidateSet, SourceArtifact, SourceKind};
pub use error::EngineError;
pub use external::{DtsGenerator, JarArchiver, ProjectCli};
pub use freshness::FreshnessCheck;
pub use package::{assemble, Archiver, PackagingOutcome};
pub use pipeline::{
    generate, Collaborators, DeclarationGenerator, GenerateOptions, GenerateReport,
    ProjectBuilder,
};
pub use prompt::{default_page_size, PromptSelector};
pub use scan::{scan_cache, ScanOutcome};
pub use select::{select_dependencies, Choice, RuleSelector, Selector};
