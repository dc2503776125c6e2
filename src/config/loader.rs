//! Configuration file discovery, loading and validation.

use crate::config::schema::ProjectConfig;
use crate::error::{Result, TvbuildError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the project config file inside the application directory.
pub const CONFIG_FILE_NAME: &str = ".tvbuild.yml";

/// Path of the default config file for an application directory.
pub fn default_config_path(app_dir: &Path) -> PathBuf {
    app_dir.join(CONFIG_FILE_NAME)
}

/// Load the project config for `app_dir`.
///
/// A missing default file yields [`ProjectConfig::default`]. An explicit
/// `override_path` must exist.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit path doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
/// Returns `ConfigValidationError` if values are unusable.
pub fn load_config(app_dir: &Path, override_path: Option<&Path>) -> Result<ProjectConfig> {
    let config = match override_path {
        Some(path) => load_config_file(path)?,
        None => {
            let path = default_config_path(app_dir);
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::debug!(
                    "No {} in {}, using defaults",
                    CONFIG_FILE_NAME,
                    app_dir.display()
                );
                ProjectConfig::default()
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TvbuildError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TvbuildError::Io(e)
        }
    })?;

    tracing::debug!("Loading config from {}", path.display());
    parse_config(&content, path)
}

/// Parse config YAML, attributing errors to `path`.
pub fn parse_config(content: &str, path: &Path) -> Result<ProjectConfig> {
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| TvbuildError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Check that config values can drive a build.
pub fn validate(config: &ProjectConfig) -> Result<()> {
    fn fail(message: &str) -> Result<()> {
        Err(TvbuildError::ConfigValidationError {
            message: message.to_string(),
        })
    }

    if config.build.command.trim().is_empty() {
        return fail("build.command must not be empty");
    }
    let output = &config.build.output_dir;
    if output.as_os_str().is_empty() {
        return fail("build.output_dir must not be empty");
    }
    // The output dir is emptied before every build.
    if !output
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return fail("build.output_dir must be a plain relative path inside the app directory");
    }
    let public: PathBuf = config
        .build
        .public_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if public.starts_with(output) || output.starts_with(&public) {
        return fail("build.output_dir and build.public_dir must not overlap");
    }
    if config.env.prefix.is_empty() {
        return fail("env.prefix must not be empty");
    }
    if config.report.bundle_warn_size == 0 || config.report.chunk_warn_size == 0 {
        return fail("report thresholds must be greater than zero");
    }

    Ok(())
}
