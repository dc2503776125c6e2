//! Single-shot production build.

use std::path::{Path, PathBuf};

use super::messages::{format_messages, StatsMessage};
use super::output_dir::{copy_public, empty_dir};
use super::policy::WarningPolicy;
use super::sizes::{measure_file_sizes, FileSizes, SizeReport};
use super::tool::{BuildTool, ToolOutcome};
use crate::config::ProjectConfig;
use crate::error::{Result, TvbuildError};

/// How many errors are surfaced when a build fails.
pub const MAX_SURFACED_ERRORS: usize = 1;

/// Lifecycle of a [`BuildOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Running,
    Succeeded,
    SucceededWithWarnings(Vec<String>),
    Failed(String),
}

impl BuildState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }
}

/// A successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    SucceededWithWarnings(Vec<String>),
}

impl BuildOutcome {
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Succeeded => &[],
            Self::SucceededWithWarnings(warnings) => warnings,
        }
    }
}

/// Filesystem settings for one build, resolved against the app directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub output_dir: PathBuf,
    pub public_dir: PathBuf,
    pub copy_exclude: Vec<String>,
    pub bundle_warn_size: u64,
    pub chunk_warn_size: u64,
}

impl BuildConfig {
    pub fn from_project(app_dir: &Path, config: &ProjectConfig) -> Self {
        Self {
            output_dir: app_dir.join(&config.build.output_dir),
            public_dir: app_dir.join(&config.build.public_dir),
            copy_exclude: config.build.copy_exclude.clone(),
            bundle_warn_size: config.report.bundle_warn_size,
            chunk_warn_size: config.report.chunk_warn_size,
        }
    }
}

/// Everything a successful build reports.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    /// Sizes of the output directory before it was emptied.
    pub previous_file_sizes: FileSizes,
    pub sizes: SizeReport,
}

impl BuildReport {
    pub fn warnings(&self) -> &[String] {
        self.outcome.warnings()
    }
}

/// Process exit code for a finished build.
pub fn exit_code(result: &Result<BuildReport>) -> i32 {
    if result.is_ok() {
        0
    } else {
        1
    }
}

/// Map a tool outcome to success or a build error.
///
/// # Errors
///
/// - `UnknownBuildError` when the tool failed without saying why
/// - `BuildDiagnosticError` with the first formatted error
/// - `WarningsEscalatedError` when `policy` is strict and there are warnings
pub fn classify(outcome: ToolOutcome, policy: WarningPolicy) -> Result<BuildOutcome> {
    let stats = match outcome {
        ToolOutcome::Failed { message: None } => return Err(TvbuildError::UnknownBuildError),
        ToolOutcome::Failed {
            message: Some(message),
        } => {
            let errors = [StatsMessage::Text(message)];
            format_messages(&errors, &[])
        }
        ToolOutcome::Completed(stats) => format_messages(&stats.errors, &stats.warnings),
    };

    let mut errors = stats.errors;
    if !errors.is_empty() {
        errors.truncate(MAX_SURFACED_ERRORS);
        let message = errors.join("\n\n");
        return Err(TvbuildError::BuildDiagnosticError { message });
    }

    let warnings = stats.warnings;
    if warnings.is_empty() {
        return Ok(BuildOutcome::Succeeded);
    }
    if policy.is_strict() {
        tracing::warn!("Escalating {} warnings to errors", warnings.len());
        return Err(TvbuildError::WarningsEscalatedError {
            message: warnings.join("\n\n"),
        });
    }
    Ok(BuildOutcome::SucceededWithWarnings(warnings))
}

/// Prepares the output directory, runs the bundler once and classifies the result.
pub struct BuildOrchestrator<T: BuildTool> {
    tool: T,
    config: BuildConfig,
    policy: WarningPolicy,
    state: BuildState,
}

impl<T: BuildTool> BuildOrchestrator<T> {
    pub fn new(tool: T, config: BuildConfig, policy: WarningPolicy) -> Self {
        Self {
            tool,
            config,
            policy,
            state: BuildState::Idle,
        }
    }

    pub fn state(&self) -> &BuildState {
        &self.state
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn policy(&self) -> WarningPolicy {
        self.policy
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Run the build.
    ///
    /// # Errors
    ///
    /// `AlreadyRun` on a second call. Otherwise IO errors from preparing
    /// the output directory, or one of the build failures from [`classify`].
    pub fn run(&mut self) -> Result<BuildReport> {
        if self.state != BuildState::Idle {
            return Err(TvbuildError::AlreadyRun);
        }
        self.state = BuildState::Running;

        let result = self.execute();
        self.state = match &result {
            Ok(report) => match &report.outcome {
                BuildOutcome::Succeeded => BuildState::Succeeded,
                BuildOutcome::SucceededWithWarnings(w) => {
                    BuildState::SucceededWithWarnings(w.clone())
                }
            },
            Err(e) => BuildState::Failed(e.to_string()),
        };
        tracing::debug!("Build finished: {:?}", self.state);
        result
    }

    fn execute(&mut self) -> Result<BuildReport> {
        let previous_file_sizes = measure_file_sizes(&self.config.output_dir)?;
        tracing::debug!(
            "Recorded {} previous asset sizes",
            previous_file_sizes.len()
        );

        empty_dir(&self.config.output_dir)?;
        copy_public(
            &self.config.public_dir,
            &self.config.output_dir,
            &self.config.copy_exclude,
        )?;

        tracing::debug!("Invoking {}", self.tool.describe());
        let outcome = self.tool.invoke().wait();
        let outcome = classify(outcome, self.policy)?;

        let sizes = SizeReport::collect(
            &self.config.output_dir,
            &previous_file_sizes,
            self.config.bundle_warn_size,
            self.config.chunk_warn_size,
        )?;

        Ok(BuildReport {
            outcome,
            previous_file_sizes,
            sizes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::tool::{BuildStats, Completion, FnBuildTool};
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn stats(errors: &[&str], warnings: &[&str]) -> ToolOutcome {
        ToolOutcome::Completed(BuildStats {
            errors: errors.iter().map(|&e| StatsMessage::from(e)).collect(),
            warnings: warnings.iter().map(|&w| StatsMessage::from(w)).collect(),
        })
    }

    struct Project {
        _temp: TempDir,
        config: BuildConfig,
    }

    fn project() -> Project {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::from_project(temp.path(), &ProjectConfig::default());
        fs::create_dir_all(&config.public_dir).unwrap();
        fs::write(config.public_dir.join("index.html"), "<html>").unwrap();
        fs::write(config.public_dir.join("favicon.ico"), "ico").unwrap();
        Project {
            _temp: temp,
            config,
        }
    }

    struct CountingTool {
        calls: Cell<usize>,
        outcome: ToolOutcome,
    }

    impl BuildTool for CountingTool {
        fn invoke(&self) -> Completion {
            self.calls.set(self.calls.get() + 1);
            Completion::ready(self.outcome.clone())
        }
    }

    #[test]
    fn classify_unknown_failure() {
        let err = classify(ToolOutcome::Failed { message: None }, WarningPolicy::Lenient)
            .unwrap_err();

        assert!(matches!(err, TvbuildError::UnknownBuildError));
        assert_eq!(err.to_string(), "Unknown build error");
    }

    #[test]
    fn classify_failure_message_is_diagnostic() {
        let err = classify(
            ToolOutcome::Failed {
                message: Some("webpack: command not found".into()),
            },
            WarningPolicy::Lenient,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "webpack: command not found");
    }

    #[test]
    fn classify_surfaces_only_first_error() {
        let err = classify(stats(&["first", "second"], &["w"]), WarningPolicy::Strict).unwrap_err();

        match err {
            TvbuildError::BuildDiagnosticError { message } => assert_eq!(message, "first"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn classify_warnings_by_policy() {
        let lenient = classify(stats(&[], &["a", "b"]), WarningPolicy::Lenient).unwrap();
        assert_eq!(
            lenient,
            BuildOutcome::SucceededWithWarnings(vec!["a".into(), "b".into()])
        );

        let strict = classify(stats(&[], &["a", "b"]), WarningPolicy::Strict).unwrap_err();
        match strict {
            TvbuildError::WarningsEscalatedError { message } => assert_eq!(message, "a\n\nb"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn classify_clean_build() {
        assert_eq!(
            classify(stats(&[], &[]), WarningPolicy::Strict).unwrap(),
            BuildOutcome::Succeeded
        );
    }

    #[test]
    fn run_prepares_output_before_invoking() {
        let project = project();
        let output = project.config.output_dir.clone();
        fs::create_dir_all(output.join("static/js")).unwrap();
        fs::write(output.join("static/js/main.0abc.js"), "old bundle").unwrap();
        fs::write(output.join("stale.txt"), "stale").unwrap();

        let seen = output.clone();
        let tool = FnBuildTool(move || {
            assert!(seen.join("favicon.ico").is_file());
            assert!(!seen.join("index.html").exists());
            assert!(!seen.join("stale.txt").exists());
            fs::create_dir_all(seen.join("static/js")).unwrap();
            fs::write(seen.join("static/js/main.a1b2.js"), "new bundle contents").unwrap();
            stats(&[], &[])
        });

        let mut orchestrator = BuildOrchestrator::new(tool, project.config.clone(), WarningPolicy::Lenient);
        let report = orchestrator.run().unwrap();

        assert_eq!(orchestrator.state(), &BuildState::Succeeded);
        assert!(report.previous_file_sizes.contains_key("static/js/main.js"));
        assert_eq!(report.sizes.entries().len(), 1);
        assert!(report.sizes.entries()[0].previous.is_some());
        assert_eq!(exit_code(&Ok(report)), 0);
    }

    #[test]
    fn run_records_warnings() {
        let project = project();
        let tool = FnBuildTool(|| stats(&[], &["unused variable"]));

        let mut orchestrator = BuildOrchestrator::new(tool, project.config.clone(), WarningPolicy::Lenient);
        let report = orchestrator.run().unwrap();

        assert_eq!(report.warnings(), ["unused variable".to_string()]);
        assert_eq!(
            orchestrator.state(),
            &BuildState::SucceededWithWarnings(vec!["unused variable".into()])
        );
    }

    #[test]
    fn run_failure_sets_failed_state() {
        let project = project();
        let tool = FnBuildTool(|| ToolOutcome::Failed { message: None });

        let mut orchestrator = BuildOrchestrator::new(tool, project.config.clone(), WarningPolicy::Lenient);
        let result = orchestrator.run();

        assert_eq!(exit_code(&result), 1);
        assert_eq!(
            orchestrator.state(),
            &BuildState::Failed("Unknown build error".into())
        );
        assert!(orchestrator.state().is_finished());
    }

    #[test]
    fn run_is_single_shot() {
        let project = project();
        let tool = CountingTool {
            calls: Cell::new(0),
            outcome: stats(&[], &[]),
        };

        let mut orchestrator = BuildOrchestrator::new(tool, project.config.clone(), WarningPolicy::Lenient);
        orchestrator.run().unwrap();
        let second = orchestrator.run();

        assert!(matches!(second, Err(TvbuildError::AlreadyRun)));
        assert_eq!(orchestrator.tool().calls.get(), 1);
        assert_eq!(orchestrator.state(), &BuildState::Succeeded);
    }

    #[test]
    fn strict_policy_fails_on_warnings() {
        let project = project();
        let tool = FnBuildTool(|| stats(&[], &["w"]));

        let mut orchestrator = BuildOrchestrator::new(tool, project.config.clone(), WarningPolicy::Strict);
        let err = orchestrator.run().unwrap_err();

        assert!(err.is_build_failure());
        assert!(matches!(orchestrator.state(), BuildState::Failed(_)));
    }
}
