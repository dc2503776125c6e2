//! Environment variable layering.
//!
//! This module provides priority-based environment variable management
//! with source tracking, used to merge the monorepo-root and application
//! `.env` files.

use std::collections::BTreeMap;

/// Represents a layer of environment variables.
///
/// # Example
///
/// ```
/// use tvbuild::config::EnvLayer;
///
/// let mut layer = EnvLayer::new("app");
/// layer.set("REACT_APP_API_URL", "https://api.example.com");
///
/// assert_eq!(layer.vars.get("REACT_APP_API_URL").map(String::as_str), Some("https://api.example.com"));
/// assert_eq!(layer.source, "app");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    /// Variables in this layer.
    pub vars: BTreeMap<String, String>,
    /// Source of this layer (for debugging).
    pub source: String,
}

impl EnvLayer {
    /// Create a new layer with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            vars: BTreeMap::new(),
            source: source.into(),
        }
    }

    /// Create a layer from already-parsed variables.
    pub fn from_vars(source: impl Into<String>, vars: BTreeMap<String, String>) -> Self {
        Self {
            vars,
            source: source.into(),
        }
    }

    /// Add a variable to this layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Check if this layer has a variable.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Get the number of variables in this layer.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if this layer is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Manages layered environment variables.
///
/// Variables from higher layers override variables from lower layers.
/// The first layer pushed has lowest priority, the last has highest.
///
/// # Example
///
/// ```
/// use tvbuild::config::{EnvLayer, EnvLayerStack};
///
/// let mut stack = EnvLayerStack::new();
///
/// let mut root = EnvLayer::new("monorepo");
/// root.set("REACT_APP_API_URL", "https://root.example.com");
/// root.set("ROOT_ONLY", "1");
/// stack.push(root);
///
/// let mut app = EnvLayer::new("app");
/// app.set("REACT_APP_API_URL", "https://app.example.com");
/// stack.push(app);
///
/// assert_eq!(stack.get("REACT_APP_API_URL"), Some("https://app.example.com"));
/// assert_eq!(stack.get("ROOT_ONLY"), Some("1"));
/// assert_eq!(stack.source_of("REACT_APP_API_URL"), Some("app"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvLayerStack {
    /// Layers from lowest to highest priority.
    layers: Vec<EnvLayer>,
}

impl EnvLayerStack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Self { layers: vec![] }
    }

    /// Add a layer. Later layers have higher priority.
    pub fn push(&mut self, layer: EnvLayer) {
        self.layers.push(layer);
    }

    /// Get the resolved value for a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.vars.get(key).map(String::as_str))
    }

    /// Get all resolved variables.
    ///
    /// Higher priority layers override lower priority layers.
    pub fn resolve(&self) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        for layer in &self.layers {
            result.extend(layer.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        result
    }

    /// Get the source of a variable's value.
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.vars.contains_key(key))
            .map(|layer| layer.source.as_str())
    }

    /// Get all layers for inspection.
    pub fn layers(&self) -> &[EnvLayer] {
        &self.layers
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
