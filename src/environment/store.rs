//! Ambient environment stores.
//!
//! Resolution writes every merged `.env` key into an [`EnvStore`] so the
//! bundler, which reads its own settings from the process environment,
//! sees them. Passing the store explicitly keeps that side effect visible
//! and lets tests and read-only commands use an in-memory map instead.

use std::collections::BTreeMap;

/// A writable key/value environment shared with the build tool.
pub trait EnvStore {
    /// Read a variable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a variable, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);
}

/// The real process environment.
///
/// Child processes spawned after a write inherit the value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvStore;

impl EnvStore for ProcessEnvStore {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // set_var panics on these; the parser never produces '=' in keys.
        if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
            tracing::warn!("Skipping unsupported environment variable {:?}", key);
            return;
        }
        std::env::set_var(key, value);
    }
}

/// An in-memory environment.
///
/// # Example
///
/// ```
/// use tvbuild::environment::{EnvStore, MemoryEnvStore};
///
/// let mut store = MemoryEnvStore::new();
/// store.set("NODE_ENV", "production");
/// assert_eq!(store.get("NODE_ENV").as_deref(), Some("production"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnvStore {
    vars: BTreeMap<String, String>,
}

impl MemoryEnvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with variables.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// All variables in the store.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvStore for MemoryEnvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}
