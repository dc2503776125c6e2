//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`tvbuild build`, `tvbuild env`)
//! - Shared config loading and layout discovery
//! - Consistent global flag handling

pub mod build;
pub mod completions;
pub mod dispatcher;
pub mod env;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
