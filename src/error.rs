//! Error types for tvbuild operations.
//!
//! This module defines [`TvbuildError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors abort before anything is built
//! - Build failures (`UnknownBuildError`, `BuildDiagnosticError`,
//!   `WarningsEscalatedError`) are terminal and map to a non-zero exit code
//! - Use `anyhow::Error` (via `TvbuildError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tvbuild operations.
#[derive(Debug, Error)]
pub enum TvbuildError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// A present configuration or `.env` file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The build tool failed without a usable message.
    #[error("Unknown build error")]
    UnknownBuildError,

    /// The build tool reported an error diagnostic.
    #[error("{message}")]
    BuildDiagnosticError { message: String },

    /// Warnings were produced while warnings are treated as errors.
    #[error("{message}")]
    WarningsEscalatedError { message: String },

    /// The orchestrator was asked to build twice.
    #[error("Build orchestrator has already run")]
    AlreadyRun,

    /// Shell command could not be started.
    #[error("Failed to start `{command}`: {message}")]
    CommandSpawnFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TvbuildError {
    /// Whether this error is a terminal build outcome rather than a setup problem.
    pub fn is_build_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownBuildError
                | Self::BuildDiagnosticError { .. }
                | Self::WarningsEscalatedError { .. }
        )
    }
}

/// Result type alias for tvbuild operations.
pub type Result<T> = std::result::Result<T, TvbuildError>;
