//! Staging compiled local classes and archiving them into a single JAR.

use std::path::{Path, PathBuf};

use typings_util::fs::{copy_file, reset_dir};
use typings_util::process::CommandStatus;

use crate::collect::CandidateSet;
use crate::error::EngineError;
use crate::freshness::{resolve_artifact, FreshnessCheck};

/// File name of the archive built from local classes.
pub const LOCAL_ARCHIVE_NAME: &str = "localTypings.jar";

/// Creates an archive from the contents of a directory.
pub trait Archiver {
    /// Archive everything under `source_dir` into `archive`.
    ///
    /// # Errors
    /// Returns an error if the archiver cannot be started.
    fn archive(&mut self, archive: &Path, source_dir: &Path)
        -> Result<CommandStatus, EngineError>;
}

/// Result of one assembly attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagingOutcome {
    /// Every artifact was staged and the archive was written.
    Packaged { archive_path: PathBuf },
    /// `source` has no usable compiled class; nothing was archived.
    RebuildRequired { source: PathBuf },
    /// Staging or archiving failed.
    Failed {
        reason: String,
        status: Option<CommandStatus>,
    },
}

/// Stage every artifact of `set` into `staging_dir` and archive it.
///
/// The staging directory is wiped first. Artifacts are processed Java first,
/// then Kotlin; each one is narrowed to its resolved class. The first artifact
/// without a usable class stops assembly with
/// [`PackagingOutcome::RebuildRequired`] before anything is archived.
pub fn assemble(
    staging_dir: &Path,
    set: &mut CandidateSet,
    check: FreshnessCheck,
    archiver: &mut dyn Archiver,
) -> PackagingOutcome {
    match stage(staging_dir, set, check) {
        Ok(None) => {}
        Ok(Some(source)) => return PackagingOutcome::RebuildRequired { source },
        Err(e) => {
            return PackagingOutcome::Failed {
                reason: e.to_string(),
                status: None,
            }
        }
    }

    let archive_path = staging_dir.join(LOCAL_ARCHIVE_NAME);
    match archiver.archive(&archive_path, staging_dir) {
        Ok(status) if status.success => {
            tracing::debug!(archive = %archive_path.display(), "packaged local classes");
            PackagingOutcome::Packaged { archive_path }
        }
        Ok(status) => PackagingOutcome::Failed {
            reason: format!("archiver exited with {status}"),
            status: Some(status),
        },
        Err(e) => PackagingOutcome::Failed {
            reason: e.to_string(),
            status: None,
        },
    }
}

/// Copy resolved classes into staging. Returns the first unresolved source, if any.
fn stage(
    staging_dir: &Path,
    set: &mut CandidateSet,
    check: FreshnessCheck,
) -> Result<Option<PathBuf>, EngineError> {
    reset_dir(staging_dir)?;

    for artifact in set.iter_mut() {
        let Some(winner) = resolve_artifact(artifact, check)? else {
            return Ok(Some(artifact.source_path.clone()));
        };
        artifact.narrow_to(&winner);
        copy_file(&winner, &staging_dir.join(&artifact.relative_output_path))?;
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod tests {
    use std::fs;

    use super::*;
    use crate::collect::SourceArtifact;
    use crate::freshness::tests::write_at;

    /// Records calls and writes a placeholder archive on success.
    pub(crate) struct FakeArchiver {
        pub(crate) calls: usize,
        pub(crate) exit_code: i32,
    }

    impl FakeArchiver {
        pub(crate) fn ok() -> Self {
            Self {
                calls: 0,
                exit_code: 0,
            }
        }
    }

    impl Archiver for FakeArchiver {
        fn archive(
            &mut self,
            archive: &Path,
            source_dir: &Path,
        ) -> Result<CommandStatus, EngineError> {
            self.calls += 1;
            assert!(archive.starts_with(source_dir));
            if self.exit_code == 0 {
                fs::write(archive, b"PK").unwrap();
            }
            Ok(CommandStatus {
                success: self.exit_code == 0,
                exit_code: Some(self.exit_code),
            })
        }
    }

    fn artifact(base: &Path, name: &str, candidates: &[&str]) -> SourceArtifact {
        SourceArtifact {
            source_path: base.join("src").join(name),
            relative_output_path: Path::new(name).with_extension("class"),
            candidate_compiled_paths: candidates
                .iter()
                .map(|c| base.join(c).join(Path::new(name).with_extension("class")))
                .collect(),
        }
    }

    #[test]
    fn packages_fresh_classes() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write_at(&base.join("src/com/A.java"), 1_000);
        write_at(&base.join("second/com/A.class"), 2_000);
        write_at(&base.join("src/com/B.kt"), 1_000);
        write_at(&base.join("kt/com/B.class"), 2_000);

        let mut set = CandidateSet {
            java: vec![artifact(base, "com/A.java", &["first", "second"])],
            kotlin: vec![artifact(base, "com/B.kt", &["kt"])],
        };
        let staging = base.join("staging");
        let mut archiver = FakeArchiver::ok();

        let outcome = assemble(&staging, &mut set, FreshnessCheck::Timestamps, &mut archiver);
        assert_eq!(
            outcome,
            PackagingOutcome::Packaged {
                archive_path: staging.join(LOCAL_ARCHIVE_NAME)
            }
        );
        assert_eq!(archiver.calls, 1);
        assert!(staging.join("com/A.class").is_file());
        assert!(staging.join("com/B.class").is_file());
        assert_eq!(
            set.java.first().unwrap().candidate_compiled_paths,
            vec![base.join("second/com/A.class")]
        );
    }

    #[test]
    fn stale_class_requires_rebuild_without_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write_at(&base.join("src/A.java"), 1_000);
        write_at(&base.join("out/A.class"), 2_000);
        write_at(&base.join("src/B.kt"), 3_000);
        write_at(&base.join("kt/B.class"), 2_000);

        let mut set = CandidateSet {
            java: vec![artifact(base, "A.java", &["out"])],
            kotlin: vec![artifact(base, "B.kt", &["kt"])],
        };
        let staging = base.join("staging");
        let mut archiver = FakeArchiver::ok();

        let outcome = assemble(&staging, &mut set, FreshnessCheck::Timestamps, &mut archiver);
        assert_eq!(
            outcome,
            PackagingOutcome::RebuildRequired {
                source: base.join("src/B.kt")
            }
        );
        assert_eq!(archiver.calls, 0);
        assert!(!staging.join(LOCAL_ARCHIVE_NAME).exists());
    }

    #[test]
    fn staging_is_wiped_first() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        let staging = base.join("staging");
        write_at(&staging.join("leftover.class"), 1);

        let mut set = CandidateSet::default();
        let outcome = assemble(
            &staging,
            &mut set,
            FreshnessCheck::Timestamps,
            &mut FakeArchiver::ok(),
        );
        assert!(matches!(outcome, PackagingOutcome::Packaged { .. }));
        assert!(!staging.join("leftover.class").exists());
    }

    #[test]
    fn archiver_failure_carries_status() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write_at(&base.join("src/A.java"), 1_000);
        write_at(&base.join("out/A.class"), 2_000);

        let mut set = CandidateSet {
            java: vec![artifact(base, "A.java", &["out"])],
            kotlin: Vec::new(),
        };
        let mut archiver = FakeArchiver {
            calls: 0,
            exit_code: 2,
        };
        match assemble(
            &base.join("staging"),
            &mut set,
            FreshnessCheck::Timestamps,
            &mut archiver,
        ) {
            PackagingOutcome::Failed { reason, status } => {
                assert!(reason.contains("exit code 2"), "reason was: {reason}");
                assert_eq!(status.unwrap().exit_code, Some(2));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_source_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        let mut set = CandidateSet {
            java: vec![artifact(base, "Gone.java", &["out"])],
            kotlin: Vec::new(),
        };
        let mut archiver = FakeArchiver::ok();
        let outcome = assemble(
            &base.join("staging"),
            &mut set,
            FreshnessCheck::Timestamps,
            &mut archiver,
        );
        assert!(matches!(outcome, PackagingOutcome::Failed { status: None, .. }));
        assert_eq!(archiver.calls, 0);
    }

    #[test]
    fn existence_only_accepts_older_classes() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        write_at(&base.join("src/A.kt"), 5_000);
        write_at(&base.join("kt/A.class"), 1_000);

        let mut set = CandidateSet {
            java: Vec::new(),
            kotlin: vec![artifact(base, "A.kt", &["kt"])],
        };
        let outcome = assemble(
            &base.join("staging"),
            &mut set,
            FreshnessCheck::ExistenceOnly,
            &mut FakeArchiver::ok(),
        );
        assert!(matches!(outcome, PackagingOutcome::Packaged { .. }));
    }
}
