//! Collecting in-project Java and Kotlin sources with their compiled-class candidates.

use std::path::{Path, PathBuf};

use typings_config::OutputRoots;
use typings_util::fs::walk_files;

use crate::error::EngineError;

/// Source language of a file under the source root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Java,
    Kotlin,
    Ignored,
}

impl SourceKind {
    /// Classify a file by its extension.
    pub fn classify(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("java") => SourceKind::Java,
            Some("kt") => SourceKind::Kotlin,
            _ => SourceKind::Ignored,
        }
    }
}

/// One source file and where its compiled class may live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    pub source_path: PathBuf,
    /// Class file path relative to any output root, e.g. `com/foo/Bar.class`.
    pub relative_output_path: PathBuf,
    /// Candidate class files in preference order.
    pub candidate_compiled_paths: Vec<PathBuf>,
}

impl SourceArtifact {
    /// Keep only `winner` as the candidate.
    ///
    /// Has no effect unless `winner` is already one of the candidates.
    pub fn narrow_to(&mut self, winner: &Path) {
        if self.candidate_compiled_paths.iter().any(|c| c == winner) {
            self.candidate_compiled_paths = vec![winner.to_path_buf()];
        }
    }
}

/// Source artifacts grouped by kind, each group in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pub java: Vec<SourceArtifact>,
    pub kotlin: Vec<SourceArtifact>,
}

impl CandidateSet {
    /// True if at least one Java or Kotlin source was found.
    pub fn has_entries(&self) -> bool {
        !self.java.is_empty() || !self.kotlin.is_empty()
    }

    /// Number of sources across both kinds.
    pub fn len(&self) -> usize {
        self.java.len() + self.kotlin.len()
    }

    /// Inverse of [`CandidateSet::has_entries`].
    pub fn is_empty(&self) -> bool {
        !self.has_entries()
    }

    /// Java artifacts first, then Kotlin.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SourceArtifact> {
        self.java.iter_mut().chain(self.kotlin.iter_mut())
    }
}

/// Walk `source_root` and build a [`CandidateSet`] against the configured output roots.
///
/// A missing source root yields an empty set.
///
/// # Errors
/// Returns an error if the source tree exists but cannot be read.
pub fn collect_sources(
    source_root: &Path,
    output_roots: &OutputRoots,
) -> Result<CandidateSet, EngineError> {
    let mut set = CandidateSet::default();
    if !source_root.is_dir() {
        tracing::debug!(root = %source_root.display(), "no local source directory");
        return Ok(set);
    }

    for path in walk_files(source_root)? {
        let (roots, group) = match SourceKind::classify(&path) {
            SourceKind::Java => (&output_roots.java, &mut set.java),
            SourceKind::Kotlin => (&output_roots.kotlin, &mut set.kotlin),
            SourceKind::Ignored => continue,
        };
        let Ok(relative) = path.strip_prefix(source_root) else {
            continue;
        };
        let relative_output_path = relative.with_extension("class");
        let candidate_compiled_paths = roots
            .iter()
            .map(|root| root.join(&relative_output_path))
            .collect();
        group.push(SourceArtifact {
            source_path: path.clone(),
            relative_output_path,
            candidate_compiled_paths,
        });
    }

    tracing::debug!(
        java = set.java.len(),
        kotlin = set.kotlin.len(),
        "collected local sources"
    );
    Ok(set)
}
