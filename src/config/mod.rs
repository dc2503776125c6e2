//! Configuration loading, `.env` parsing and layering for tvbuild.
//!
//! This module handles:
//! - The optional project config (`.tvbuild.yml`) in [`schema`] and [`loader`]
//! - Strict `.env` parsing in [`env_file`]
//! - Priority-based merging of `.env` sources in [`env_layer`]
//! - Monorepo root discovery in [`layout`]
//!
//! # Example
//!
//! ```
//! use tvbuild::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".tvbuild.yml"), "build:\n  output_dir: dist\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.build.output_dir, std::path::PathBuf::from("dist"));
//! ```

pub mod env_file;
pub mod env_layer;
pub mod layout;
pub mod loader;
pub mod schema;

pub use env_file::{EnvFileParser, EnvParseError};
pub use env_layer::{EnvLayer, EnvLayerStack};
pub use layout::{find_workspace_root, ProjectLayout};
pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, validate, CONFIG_FILE_NAME,
};
pub use schema::{
    BuildSettings, EnvSettings, ProjectConfig, ReportSettings, WARN_AFTER_BUNDLE_GZIP_SIZE,
    WARN_AFTER_CHUNK_GZIP_SIZE,
};
