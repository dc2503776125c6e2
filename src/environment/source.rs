//! On-disk `.env` sources.

use std::path::{Path, PathBuf};

use crate::config::{EnvFileParser, EnvLayer};
use crate::error::Result;

/// File read in development.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// File read for production builds.
pub const PRODUCTION_ENV_FILE: &str = ".env.production";

/// One candidate `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSource {
    /// Layer name used for provenance (`monorepo` or `app`).
    pub layer: String,
    /// Candidate file path.
    pub path: PathBuf,
    /// Whether the file existed when the source was created.
    pub exists: bool,
}

impl EnvironmentSource {
    /// Pick the candidate file in `dir` for the given mode and check it exists.
    pub fn candidate(layer: impl Into<String>, dir: &Path, is_production: bool) -> Self {
        let file = if is_production {
            PRODUCTION_ENV_FILE
        } else {
            DEFAULT_ENV_FILE
        };
        let path = dir.join(file);
        let exists = path.is_file();

        Self {
            layer: layer.into(),
            path,
            exists,
        }
    }

    /// Parse the file into a layer; a missing file is an empty layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` naming the file if it is present but malformed.
    pub fn load(&self) -> Result<EnvLayer> {
        if !self.exists {
            tracing::debug!("No {} env file at {}", self.layer, self.path.display());
            return Ok(EnvLayer::new(self.layer.clone()));
        }

        let vars = EnvFileParser::load(&self.path)?;
        tracing::debug!(
            "Loaded {} variables from {} ({})",
            vars.len(),
            self.path.display(),
            self.layer
        );
        Ok(EnvLayer::from_vars(self.layer.clone(), vars))
    }
}
