//! Client environment resolution.
//!
//! Merges the monorepo-root and application `.env` files (application
//! wins), pushes every merged key into the ambient [`EnvStore`], and
//! derives the allow-listed [`ClientEnvironment`] that is substituted into
//! generated code.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{EnvLayerStack, ProjectLayout};
use crate::error::{Result, TvbuildError};

use super::allow_list::AllowList;
use super::source::EnvironmentSource;
use super::store::EnvStore;

/// Mode used when neither the `.env` files nor the process set `NODE_ENV`.
pub const DEFAULT_MODE: &str = "development";

/// Variable that can supply the public URL when no explicit one is given.
pub const PUBLIC_URL_VAR: &str = "PUBLIC_URL";

/// Inputs to a resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Application directory.
    pub app_dir: PathBuf,
    /// Monorepo root directory.
    pub monorepo_root: PathBuf,
    /// Whether the monorepo source is consulted at all.
    pub is_monorepo: bool,
    /// Read `.env.production` instead of `.env`.
    pub is_production: bool,
    /// Public URL the app is served from.
    pub public_url: String,
    /// Prefer a non-empty `PUBLIC_URL` from the store (after injection)
    /// over `public_url`.
    pub public_url_from_env: bool,
    /// Which keys reach the client environment.
    pub allow_list: AllowList,
}

impl ResolveOptions {
    /// Options for a discovered project layout.
    pub fn new(
        layout: &ProjectLayout,
        is_production: bool,
        public_url: impl Into<String>,
        allow_list: AllowList,
    ) -> Self {
        Self {
            app_dir: layout.app_dir.clone(),
            monorepo_root: layout.monorepo_root.clone(),
            is_monorepo: layout.is_monorepo,
            is_production,
            public_url: public_url.into(),
            public_url_from_env: false,
            allow_list,
        }
    }

    /// Let `PUBLIC_URL` from the process or the `.env` files override
    /// `public_url`.
    pub fn with_public_url_from_env(mut self) -> Self {
        self.public_url_from_env = true;
        self
    }
}

/// The `process.env` object substituted into generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringifiedEnv {
    /// Same keys as `raw`, values JSON-quoted.
    #[serde(rename = "process.env")]
    pub process_env: BTreeMap<String, String>,
}

/// The environment exposed to client code, in raw and stringified form.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use tvbuild::environment::ClientEnvironment;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("REACT_APP_TITLE".to_string(), "Live \"TV\"".to_string());
///
/// let env = ClientEnvironment::build(vars, "production", "/").unwrap();
/// assert_eq!(env.raw["PUBLIC_URL"], "");
/// assert_eq!(env.stringified.process_env["REACT_APP_TITLE"], r#""Live \"TV\"""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientEnvironment {
    /// Allow-listed variables plus `NODE_ENV` and `PUBLIC_URL`.
    pub raw: BTreeMap<String, String>,
    /// JSON-quoted view of `raw`.
    pub stringified: StringifiedEnv,
}

impl ClientEnvironment {
    /// Build both views from filtered variables, the mode and the public URL.
    pub fn build(filtered: BTreeMap<String, String>, mode: &str, public_url: &str) -> Result<Self> {
        let mut raw = filtered;
        raw.insert("NODE_ENV".to_string(), mode.to_string());
        raw.insert(
            "PUBLIC_URL".to_string(),
            public_url_prefix(public_url).to_string(),
        );

        let process_env: BTreeMap<String, String> = raw
            .iter()
            .map(|(k, v)| serde_json::to_string(v).map(|quoted| (k.clone(), quoted)))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| TvbuildError::Other(e.into()))?;

        Ok(Self {
            raw,
            stringified: StringifiedEnv { process_env },
        })
    }
}

/// `PUBLIC_URL` value for a public URL: empty when it is root-relative.
pub fn public_url_prefix(public_url: &str) -> &'static str {
    if public_url.starts_with('/') {
        ""
    } else {
        "/"
    }
}

/// A resolution together with its provenance.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The client environment.
    pub client: ClientEnvironment,
    /// The merged `.env` layers (monorepo first, app second).
    pub layers: EnvLayerStack,
    /// The candidate files that were considered.
    pub sources: Vec<EnvironmentSource>,
    /// The public URL the environment was derived for.
    pub public_url: String,
}

/// Resolves the client environment from `.env` files.
///
/// Every call re-reads disk; nothing is cached.
#[derive(Debug, Clone)]
pub struct EnvironmentResolver {
    options: ResolveOptions,
}

impl EnvironmentResolver {
    /// Create a resolver.
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// The options this resolver was created with.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// The candidate files for the current options, existence checked now.
    ///
    /// The monorepo source is only listed when the project is a monorepo.
    pub fn sources(&self) -> Vec<EnvironmentSource> {
        let mut sources = Vec::with_capacity(2);
        if self.options.is_monorepo {
            sources.push(EnvironmentSource::candidate(
                "monorepo",
                &self.options.monorepo_root,
                self.options.is_production,
            ));
        }
        sources.push(EnvironmentSource::candidate(
            "app",
            &self.options.app_dir,
            self.options.is_production,
        ));
        sources
    }

    /// Resolve and return only the client environment.
    pub fn resolve(&self, store: &mut dyn EnvStore) -> Result<ClientEnvironment> {
        self.resolve_detailed(store).map(|r| r.client)
    }

    /// Resolve, keeping layer provenance.
    ///
    /// All sources are parsed before the store is touched, so a malformed
    /// file leaves the ambient environment unchanged.
    pub fn resolve_detailed(&self, store: &mut dyn EnvStore) -> Result<Resolution> {
        let sources = self.sources();

        let mut layers = EnvLayerStack::new();
        for source in &sources {
            layers.push(source.load()?);
        }

        let merged = layers.resolve();
        for (key, value) in &merged {
            store.set(key, value);
        }
        tracing::debug!("Injected {} variables into the environment", merged.len());

        let filtered: BTreeMap<String, String> = merged
            .into_iter()
            .filter(|(key, _)| self.options.allow_list.allows(key))
            .collect();

        let mode = store
            .get("NODE_ENV")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODE.to_string());

        let public_url = self
            .options
            .public_url_from_env
            .then(|| store.get(PUBLIC_URL_VAR))
            .flatten()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.options.public_url.clone());

        let client = ClientEnvironment::build(filtered, &mode, &public_url)?;
        tracing::debug!(
            "Client environment has {} keys (mode {})",
            client.raw.len(),
            mode
        );

        Ok(Resolution {
            client,
            layers,
            sources,
            public_url,
        })
    }
}
