//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// tvbuild - Production builds for browser apps with `.env` support.
#[derive(Debug, Parser)]
#[command(name = "tvbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .tvbuild.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the app directory (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an optimized production build
    Build(BuildArgs),

    /// Show the environment exposed to client code
    Env(EnvArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// URL the app is served from (overrides build.public_url)
    #[arg(long, env = "PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Bundler command (overrides build.command)
    #[arg(long)]
    pub command: Option<String>,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvArgs {
    /// Read .env.production instead of .env
    #[arg(long)]
    pub production: bool,

    /// URL the app is served from (overrides build.public_url)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Print the substituted constants as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
