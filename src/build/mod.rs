//! Production build orchestration.
//!
//! [`BuildOrchestrator`] snapshots the previous output sizes, prepares the
//! output directory, invokes a [`BuildTool`] once and classifies what it
//! reports:
//!
//! - [`tool`] - the bundler seam and its one-shot [`Completion`]
//! - [`messages`] - diagnostic clean-up
//! - [`policy`] - whether warnings fail the build
//! - [`sizes`] - gzip size measurement and the size report
//! - [`output_dir`] - emptying and seeding the output directory

pub mod messages;
pub mod orchestrator;
pub mod output_dir;
pub mod policy;
pub mod sizes;
pub mod tool;

pub use messages::{format_message, format_messages, FormattedMessages, StatsMessage};
pub use orchestrator::{
    classify, exit_code, BuildConfig, BuildOrchestrator, BuildOutcome, BuildReport, BuildState,
    MAX_SURFACED_ERRORS,
};
pub use policy::WarningPolicy;
pub use sizes::{FileSizes, SizeDelta, SizeEntry, SizeReport};
pub use tool::{
    BuildStats, BuildTool, Completion, CompletionSender, FnBuildTool, ProcessBuildTool,
    ToolOutcome,
};
