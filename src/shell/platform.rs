//! Platform-specific shell detection.

use std::path::PathBuf;

/// Shell used to run the configured build command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandShell {
    /// Shell executable.
    pub program: PathBuf,
    /// Flag that makes the shell run its next argument as a command.
    pub flag: &'static str,
}

/// The shell build commands run under.
///
/// A plain POSIX `sh` on Unix, never the user's login shell: profile
/// scripts may print to stdout, which would corrupt the stats JSON.
pub fn command_shell() -> CommandShell {
    if cfg!(target_os = "windows") {
        CommandShell {
            program: std::env::var("COMSPEC")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cmd.exe")),
            flag: "/C",
        }
    } else {
        CommandShell {
            program: PathBuf::from("/bin/sh"),
            flag: "-c",
        }
    }
}

/// Check if running in a CI environment.
///
/// Used in `main()` to force non-interactive output. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
///
/// This is broader than [`WarningPolicy`](crate::build::WarningPolicy),
/// which only looks at the value of `CI`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}
