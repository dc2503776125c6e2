//! Shell command execution.

use crate::error::{Result, TvbuildError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::command_shell;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

/// Execute a shell command and wait for it, capturing stdout and stderr.
///
/// The child inherits the process environment. A non-zero exit is not an error; inspect [`CommandResult::success`].
///
/// # Errors
///
/// Returns `CommandSpawnFailed` if the shell cannot be started.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let shell = command_shell();

    let mut cmd = Command::new(&shell.program);
    cmd.arg(shell.flag).arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running `{}` via {}", command, shell.program.display());
    let output = cmd.output().map_err(|e| TvbuildError::CommandSpawnFailed {
        command: command.to_string(),
        message: e.to_string(),
    })?;

    let result = CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
        success: output.status.success(),
    };
    tracing::debug!(
        "`{}` exited with {:?} after {:?}",
        command,
        result.exit_code,
        result.duration
    );
    Ok(result)
}
