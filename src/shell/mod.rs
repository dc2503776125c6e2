//! Shell command execution.

pub mod command;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult};
pub use platform::{command_shell, is_ci, CommandShell};
