//! The bundler seam.
//!
//! A [`BuildTool`] is invoked once and reports back through a one-shot
//! [`Completion`]. The orchestrator only sees [`ToolOutcome`]s, so tests
//! substitute a closure for the real bundler.

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use super::messages::StatsMessage;
use crate::shell::{self, CommandOptions, CommandResult};

/// Errors and warnings reported by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildStats {
    pub errors: Vec<StatsMessage>,
    pub warnings: Vec<StatsMessage>,
}

impl BuildStats {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// What a single bundler invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The bundler ran and reported stats (which may contain errors).
    Completed(BuildStats),
    /// The bundler could not run or crashed; the message may be absent.
    Failed { message: Option<String> },
}

/// Sending half of a [`Completion`].
///
/// Consumed by [`complete`](Self::complete), so an outcome is delivered at
/// most once. Dropping it unused delivers a failure with no message.
#[derive(Debug)]
pub struct CompletionSender {
    tx: mpsc::Sender<ToolOutcome>,
}

impl CompletionSender {
    pub fn complete(self, outcome: ToolOutcome) {
        if self.tx.send(outcome).is_err() {
            tracing::debug!("Build completion dropped before the tool finished");
        }
    }
}

/// A pending bundler outcome.
#[derive(Debug)]
pub struct Completion {
    rx: mpsc::Receiver<ToolOutcome>,
}

impl Completion {
    /// Create a linked sender and completion.
    pub fn pending() -> (CompletionSender, Self) {
        let (tx, rx) = mpsc::channel();
        (CompletionSender { tx }, Self { rx })
    }

    /// A completion that is already resolved.
    pub fn ready(outcome: ToolOutcome) -> Self {
        let (sender, completion) = Self::pending();
        sender.complete(outcome);
        completion
    }

    /// Block until the tool reports back.
    pub fn wait(self) -> ToolOutcome {
        self.rx.recv().unwrap_or_else(|_| {
            tracing::warn!("Build tool finished without reporting an outcome");
            ToolOutcome::Failed { message: None }
        })
    }
}

/// Something that can run one bundler pass.
pub trait BuildTool {
    /// Start the bundler. Must not block on the build itself.
    fn invoke(&self) -> Completion;

    /// Short description for progress output.
    fn describe(&self) -> String {
        "build tool".to_string()
    }
}

/// A tool backed by a closure, for embedding and tests.
pub struct FnBuildTool<F>(pub F);

impl<F> BuildTool for FnBuildTool<F>
where
    F: Fn() -> ToolOutcome,
{
    fn invoke(&self) -> Completion {
        Completion::ready((self.0)())
    }
}

/// Runs the configured bundler command in a shell.
///
/// The command is expected to print JSON stats with `errors` and
/// `warnings` arrays on stdout. The child inherits the process
/// environment, including anything injected by the resolver.
#[derive(Debug, Clone)]
pub struct ProcessBuildTool {
    command: String,
    cwd: PathBuf,
}

impl ProcessBuildTool {
    pub fn new(command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl BuildTool for ProcessBuildTool {
    fn invoke(&self) -> Completion {
        let (sender, completion) = Completion::pending();
        let command = self.command.clone();
        let options = CommandOptions {
            cwd: Some(self.cwd.clone()),
        };

        thread::spawn(move || {
            let outcome = match shell::execute(&command, &options) {
                Ok(result) => outcome_from_result(&result),
                Err(e) => ToolOutcome::Failed {
                    message: Some(e.to_string()),
                },
            };
            sender.complete(outcome);
        });

        completion
    }

    fn describe(&self) -> String {
        format!("`{}`", self.command)
    }
}

/// Interpret a finished bundler process.
///
/// Stats on stdout win regardless of the exit code, since bundlers exit
/// non-zero when they report errors.
pub fn outcome_from_result(result: &CommandResult) -> ToolOutcome {
    if let Some(stats) = parse_stats(&result.stdout) {
        return ToolOutcome::Completed(stats);
    }

    if result.success {
        tracing::debug!("Build command printed no stats; assuming a clean build");
        return ToolOutcome::Completed(BuildStats::default());
    }

    let message = [&result.stderr, &result.stdout]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string);
    ToolOutcome::Failed { message }
}

/// Find the stats object in bundler stdout.
///
/// Accepts a JSON object starting at the beginning of any line, so
/// banner lines before the stats are tolerated. Only objects carrying an
/// `errors` or `warnings` key count.
pub fn parse_stats(stdout: &str) -> Option<BuildStats> {
    stdout
        .match_indices('{')
        .filter(|(i, _)| *i == 0 || stdout[..*i].ends_with('\n'))
        .find_map(|(i, _)| {
            let mut values =
                serde_json::Deserializer::from_str(&stdout[i..]).into_iter::<serde_json::Value>();
            let value = values.next()?.ok()?;
            let object = value.as_object()?;
            if !object.contains_key("errors") && !object.contains_key("warnings") {
                return None;
            }
            serde_json::from_value(value).ok()
        })
}
