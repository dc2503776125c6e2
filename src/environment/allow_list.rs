//! Allow-list filter for client-visible variables.

use regex::{Regex, RegexBuilder};

use crate::config::EnvSettings;
use crate::error::{Result, TvbuildError};

/// Decides which merged keys reach generated build output.
///
/// A key passes when it starts with the prefix (case-insensitive) or
/// exactly equals one of the allowed names.
///
/// # Example
///
/// ```
/// use tvbuild::environment::AllowList;
///
/// let allow = AllowList::new("REACT_APP_", ["PORT"]).unwrap();
/// assert!(allow.allows("REACT_APP_API_URL"));
/// assert!(allow.allows("react_app_debug"));
/// assert!(allow.allows("PORT"));
/// assert!(!allow.allows("port"));
/// assert!(!allow.allows("SECRET_KEY"));
/// ```
#[derive(Debug, Clone)]
pub struct AllowList {
    prefix: Regex,
    exact: Vec<String>,
}

impl AllowList {
    /// Build an allow list from a literal prefix and exact names.
    pub fn new<S: Into<String>>(prefix: &str, exact: impl IntoIterator<Item = S>) -> Result<Self> {
        let prefix = RegexBuilder::new(&format!("^{}", regex::escape(prefix)))
            .case_insensitive(true)
            .build()
            .map_err(|e| TvbuildError::ConfigValidationError {
                message: format!("invalid env prefix: {}", e),
            })?;

        Ok(Self {
            prefix,
            exact: exact.into_iter().map(Into::into).collect(),
        })
    }

    /// Build the allow list described by the `env` config section.
    pub fn from_settings(settings: &EnvSettings) -> Result<Self> {
        Self::new(&settings.prefix, settings.allow.iter().cloned())
    }

    /// Whether `key` may be exposed to client code.
    pub fn allows(&self, key: &str) -> bool {
        self.prefix.is_match(key) || self.exact.iter().any(|name| name == key)
    }
}
