//! Configuration schema definitions for tvbuild.
//!
//! These structs map to the optional `.tvbuild.yml` file in the
//! application directory. Every field has a default so an empty or
//! missing file yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.tvbuild.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// How the bundler is invoked and where output goes.
    pub build: BuildSettings,

    /// Which resolved variables reach generated code.
    pub env: EnvSettings,

    /// Size report thresholds.
    pub report: ReportSettings,
}

/// Build invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Shell command that runs the bundler. Structured stats are read
    /// from its stdout when it prints a JSON object.
    pub command: String,

    /// Output directory, relative to the application directory.
    pub output_dir: PathBuf,

    /// Static assets copied into the output directory before the build.
    pub public_dir: PathBuf,

    /// Public URL the app is served from.
    pub public_url: String,

    /// File names in `public_dir` that are not copied.
    pub copy_exclude: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            command: default_command(),
            output_dir: PathBuf::from("build"),
            public_dir: PathBuf::from("public"),
            public_url: "/".to_string(),
            copy_exclude: vec!["index.html".to_string()],
        }
    }
}

fn default_command() -> String {
    "npx webpack --mode production --json".to_string()
}

/// Allow-list settings for client-visible variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSettings {
    /// Case-insensitive prefix a key must carry to reach generated code.
    pub prefix: String,

    /// Exact key names that are always allowed.
    pub allow: Vec<String>,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            prefix: "REACT_APP_".to_string(),
            allow: vec!["PORT".to_string()],
        }
    }
}

/// Gzip size thresholds used to highlight large output files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Main bundle size (bytes, gzipped) above which the entry is flagged.
    pub bundle_warn_size: u64,

    /// Chunk size (bytes, gzipped) above which the entry is flagged.
    pub chunk_warn_size: u64,
}

/// 512 KiB.
pub const WARN_AFTER_BUNDLE_GZIP_SIZE: u64 = 512 * 1024;

/// 1 MiB.
pub const WARN_AFTER_CHUNK_GZIP_SIZE: u64 = 1024 * 1024;

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            bundle_warn_size: WARN_AFTER_BUNDLE_GZIP_SIZE,
            chunk_warn_size: WARN_AFTER_CHUNK_GZIP_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ProjectConfig::default();
        assert_eq!(config.build.output_dir, PathBuf::from("build"));
        assert_eq!(config.build.public_dir, PathBuf::from("public"));
        assert_eq!(config.build.public_url, "/");
        assert_eq!(config.build.copy_exclude, vec!["index.html"]);
        assert_eq!(config.env.prefix, "REACT_APP_");
        assert_eq!(config.env.allow, vec!["PORT"]);
        assert_eq!(config.report.bundle_warn_size, 524_288);
        assert_eq!(config.report.chunk_warn_size, 1_048_576);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r#"
build:
  command: node scripts/bundle.js
report:
  chunk_warn_size: 2048
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.build.command, "node scripts/bundle.js");
        assert_eq!(config.build.output_dir, PathBuf::from("build"));
        assert_eq!(config.report.chunk_warn_size, 2048);
        assert_eq!(config.report.bundle_warn_size, WARN_AFTER_BUNDLE_GZIP_SIZE);
    }
}
