//! Process execution helpers for typings.
//!
//! External tools run with inherited stdio so their progress output reaches the
//! terminal directly; only the exit status comes back to the caller.

use std::fmt;
use std::process::Command;

use crate::error::UtilError;

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Whether the command exited successfully.
    pub success: bool,
    /// The exit code, if the process was not killed by a signal.
    pub exit_code: Option<i32>,
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Run a command to completion, inheriting stdin/stdout/stderr.
///
/// # Errors
/// Returns an error if the command cannot be spawned (e.g. binary not found).
/// A non-zero exit code is **not** an error; check `CommandStatus::success` instead.
pub fn run_status(cmd: &mut Command) -> Result<CommandStatus, UtilError> {
    let status = cmd.status().map_err(|source| UtilError::CommandExec {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })?;

    Ok(CommandStatus {
        success: status.success(),
        exit_code: status.code(),
    })
}
