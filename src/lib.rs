//! tvbuild - Production builds for browser apps with `.env` support.
//!
//! tvbuild resolves `.env` files (app and monorepo root) into the constants
//! a bundler substitutes into client code, prepares the output directory,
//! runs the bundler once and reports diagnostics and gzip sizes.
//!
//! # Modules
//!
//! - [`build`] - Build orchestration, diagnostics and size reports
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.env` parsing, layering and project configuration
//! - [`environment`] - Client environment resolution
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Shell command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use tvbuild::config::ProjectLayout;
//! use tvbuild::environment::{AllowList, EnvironmentResolver, MemoryEnvStore, ResolveOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join(".env"), "REACT_APP_API=/api\nSECRET=x\n").unwrap();
//!
//! let layout = ProjectLayout::standalone(dir.path());
//! let allow = AllowList::new("REACT_APP_", ["PORT"]).unwrap();
//! let resolver = EnvironmentResolver::new(ResolveOptions::new(&layout, false, "/", allow));
//!
//! let mut store = MemoryEnvStore::new();
//! let env = resolver.resolve(&mut store).unwrap();
//! assert_eq!(env.raw["REACT_APP_API"], "/api");
//! assert_eq!(env.stringified.process_env["REACT_APP_API"], "\"/api\"");
//! assert!(!env.raw.contains_key("SECRET"));
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod shell;
pub mod ui;

pub use error::{Result, TvbuildError};
