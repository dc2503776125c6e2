//! Client build environment resolution.
//!
//! Produces the variables a build sees from two `.env` sources merged in
//! this order (later wins):
//!
//! 1. Monorepo root `.env` / `.env.production` (only inside a monorepo)
//! 2. Application `.env` / `.env.production`
//!
//! Every merged key is written to the ambient [`EnvStore`]; only keys
//! passing the [`AllowList`] reach the [`ClientEnvironment`].

pub mod allow_list;
pub mod resolver;
pub mod source;
pub mod store;

pub use allow_list::AllowList;
pub use resolver::{
    public_url_prefix, ClientEnvironment, EnvironmentResolver, Resolution, ResolveOptions,
    StringifiedEnv, DEFAULT_MODE, PUBLIC_URL_VAR,
};
pub use source::{EnvironmentSource, DEFAULT_ENV_FILE, PRODUCTION_ENV_FILE};
pub use store::{EnvStore, MemoryEnvStore, ProcessEnvStore};
