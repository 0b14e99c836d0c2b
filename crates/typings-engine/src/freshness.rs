//! Choosing the compiled class that reflects a source file's current state.

use std::path::PathBuf;
use std::time::SystemTime;

use typings_util::fs::modified_time;

use crate::collect::SourceArtifact;
use crate::error::EngineError;

/// How strictly a compiled class must match its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessCheck {
    /// The class must be strictly newer than the source.
    Timestamps,
    /// Any existing class is accepted. Used right after a rebuild.
    ExistenceOnly,
}

/// First candidate that exists and, when `source_mtime` is given, is strictly newer.
///
/// Candidates whose metadata cannot be read are skipped.
pub fn resolve_compiled(
    source_mtime: Option<SystemTime>,
    candidates: &[PathBuf],
) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|candidate| match std::fs::metadata(candidate) {
            Ok(meta) if meta.is_file() => match source_mtime {
                None => true,
                Some(source) => meta.modified().is_ok_and(|compiled| compiled > source),
            },
            _ => false,
        })
        .cloned()
}

/// Resolve one artifact's winning compiled path under `check`.
///
/// # Errors
/// Returns an error if timestamps are checked and the source cannot be stat'ed.
pub fn resolve_artifact(
    artifact: &SourceArtifact,
    check: FreshnessCheck,
) -> Result<Option<PathBuf>, EngineError> {
    let source_mtime = match check {
        FreshnessCheck::Timestamps => Some(modified_time(&artifact.source_path)?),
        FreshnessCheck::ExistenceOnly => None,
    };
    let winner = resolve_compiled(source_mtime, &artifact.candidate_compiled_paths);
    if winner.is_none() {
        tracing::debug!(
            source = %artifact.source_path.display(),
            ?check,
            "no usable compiled class"
        );
    }
    Ok(winner)
}
