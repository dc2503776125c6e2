//! Env command implementation.
//!
//! The `tvbuild env` command shows what client code would see, resolved
//! against a snapshot of the process environment so nothing is mutated.

use std::path::{Path, PathBuf};

use crate::cli::args::EnvArgs;
use crate::config::{load_config, ProjectLayout};
use crate::environment::{
    AllowList, EnvironmentResolver, MemoryEnvStore, Resolution, ResolveOptions,
};
use crate::error::{Result, TvbuildError};
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Provenance shown for keys that no `.env` file defined.
const DERIVED_SOURCE: &str = "derived";

/// The env command implementation.
pub struct EnvCommand {
    app_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: EnvArgs,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(app_dir: &Path, config_path: Option<&Path>, args: EnvArgs) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Resolve against `store`.
    pub fn resolve(&self, store: &mut MemoryEnvStore) -> Result<Resolution> {
        let config = load_config(&self.app_dir, self.config_path.as_deref())?;
        let layout = ProjectLayout::discover(&self.app_dir);
        let allow_list = AllowList::from_settings(&config.env)?;
        let production = self.args.production;
        let options = match &self.args.public_url {
            Some(url) => ResolveOptions::new(&layout, production, url.clone(), allow_list),
            None => ResolveOptions::new(
                &layout,
                production,
                config.build.public_url.clone(),
                allow_list,
            )
            .with_public_url_from_env(),
        };

        EnvironmentResolver::new(options).resolve_detailed(store)
    }

    fn show_table(&self, ui: &mut dyn UserInterface, resolution: &Resolution) {
        let theme = Theme::detect();
        let mode = if self.args.production {
            "production"
        } else {
            "development"
        };
        ui.show_header(&format!("Client environment ({})", mode));

        for source in &resolution.sources {
            let state = if source.exists { "loaded" } else { "not found" };
            ui.show_hint(&format!(
                "{} {} ({})",
                source.layer,
                source.path.display(),
                state
            ));
        }
        ui.message("");

        let width = resolution
            .client
            .raw
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0);
        for (key, value) in &resolution.client.raw {
            let origin = resolution
                .layers
                .source_of(key)
                .unwrap_or(DERIVED_SOURCE);
            ui.message(&format!(
                "  {:<width$}  {}  {}",
                key,
                value,
                theme.dim.apply_to(format!("({})", origin)),
                width = width
            ));
        }
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut store = MemoryEnvStore::from_process();
        let resolution = self.resolve(&mut store)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&resolution.client.stringified)
                .map_err(|e| TvbuildError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.show_table(ui, &resolution);
        }

        Ok(CommandResult::success())
    }
}
