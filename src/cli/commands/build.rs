//! Build command implementation.
//!
//! The `tvbuild build` command resolves the production environment, runs
//! the bundler once and prints the outcome with a gzip size report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::build::policy::CI_ENV_VAR;
use crate::build::sizes::format_size;
use crate::build::{
    exit_code, BuildConfig, BuildOrchestrator, BuildReport, ProcessBuildTool, SizeDelta,
    SizeReport, WarningPolicy,
};
use crate::cli::args::BuildArgs;
use crate::config::{load_config, ProjectLayout};
use crate::environment::{
    AllowList, EnvStore, EnvironmentResolver, ProcessEnvStore, ResolveOptions,
};
use crate::error::{Result, TvbuildError};
use crate::ui::{format_duration, Theme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Printed when strict CI mode turned warnings into a failure.
pub const CI_ESCALATION_NOTICE: &str =
    "Treating warnings as errors because CI = true.\nMost CI servers set it automatically.";

/// The build command implementation.
pub struct BuildCommand {
    app_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: BuildArgs,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(app_dir: &Path, config_path: Option<&Path>, args: BuildArgs) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn report_success(
        &self,
        ui: &mut dyn UserInterface,
        report: &BuildReport,
        output: &str,
        public_url: &str,
    ) {
        let warnings = report.warnings();
        if warnings.is_empty() {
            ui.success("Compiled successfully.");
        } else {
            ui.warning("Compiled with warnings.");
            ui.message("");
            for warning in warnings {
                ui.message(warning);
                ui.message("");
            }
            ui.show_hint("Search for the keywords to learn more about each warning.");
            ui.show_hint("To ignore, add // eslint-disable-next-line to the line before.");
        }

        ui.message("");
        ui.message("File sizes after gzip:");
        ui.message("");
        let theme = Theme::detect();
        for line in size_report_lines(&report.sizes, output, &theme) {
            ui.message(&line);
        }

        if report.sizes.has_large_assets() {
            ui.message("");
            ui.warning("The bundle size is significantly larger than recommended.");
            ui.show_hint(
                "Consider reducing it with code splitting, or analyze the project dependencies.",
            );
        }

        ui.message("");
        ui.message(&format!(
            "The project was built assuming it is hosted at {}.",
            public_url
        ));
        ui.message(&format!("The {} folder is ready to be deployed.", output));
    }

    fn report_failure(&self, ui: &mut dyn UserInterface, error: &TvbuildError) {
        ui.error("Failed to compile.");
        ui.message("");
        ui.message(&error.to_string());
        if matches!(error, TvbuildError::WarningsEscalatedError { .. }) {
            ui.message("");
            for line in CI_ESCALATION_NOTICE.lines() {
                ui.warning(line);
            }
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.app_dir, self.config_path.as_deref())?;
        let layout = ProjectLayout::discover(&self.app_dir);
        let command = self
            .args
            .command
            .clone()
            .unwrap_or_else(|| config.build.command.clone());

        let mut store = ProcessEnvStore;
        if store.get("NODE_ENV").map_or(true, |v| v.is_empty()) {
            store.set("NODE_ENV", "production");
        }

        let allow_list = AllowList::from_settings(&config.env)?;
        let options = match &self.args.public_url {
            Some(url) => ResolveOptions::new(&layout, true, url.clone(), allow_list),
            None => ResolveOptions::new(&layout, true, config.build.public_url.clone(), allow_list)
                .with_public_url_from_env(),
        };
        let resolution = EnvironmentResolver::new(options).resolve_detailed(&mut store)?;
        let client = &resolution.client;
        let public_url = &resolution.public_url;
        tracing::debug!("Exposing {} variables to client code", client.raw.len());
        if ui.output_mode().is_verbose() {
            let keys: Vec<&str> = client.raw.keys().map(String::as_str).collect();
            ui.show_hint(&format!("Client environment: {}", keys.join(", ")));
        }

        let policy = WarningPolicy::from_ci_value(store.get(CI_ENV_VAR).as_deref());
        let build_config = BuildConfig::from_project(&self.app_dir, &config);
        let output = config.build.output_dir.display().to_string();
        let tool = ProcessBuildTool::new(command, &self.app_dir);

        let started = Instant::now();
        let mut spinner = ui.start_spinner("Creating an optimized production build...");
        let mut orchestrator = BuildOrchestrator::new(tool, build_config, policy);
        let result = orchestrator.run();
        let elapsed = format_duration(started.elapsed());

        match &result {
            Ok(report) => {
                spinner.finish_success(&format!("Build finished in {}", elapsed));
                self.report_success(ui, report, &output, public_url);
            }
            Err(e) if e.is_build_failure() => {
                spinner.finish_error(&format!("Build failed after {}", elapsed));
                self.report_failure(ui, e);
            }
            Err(_) => spinner.finish_clear(),
        }

        match result {
            Err(e) if !e.is_build_failure() => Err(e),
            other => {
                let code = exit_code(&other);
                if code == 0 {
                    Ok(CommandResult::success())
                } else {
                    Ok(CommandResult::failure(code))
                }
            }
        }
    }
}

/// Render the size report as aligned lines.
///
/// Each line is the gzipped size, the change since the previous build in
/// parentheses when there is one, then the path under the output dir.
pub fn size_report_lines(report: &SizeReport, output: &str, theme: &Theme) -> Vec<String> {
    let labels: Vec<(String, &str)> = report
        .entries()
        .iter()
        .map(|entry| {
            let size = format_size(entry.size);
            let delta = entry.delta();
            let label = match delta {
                SizeDelta::None => size,
                _ => format!("{} ({})", size, delta.label()),
            };
            (label, entry.path.as_str())
        })
        .collect();
    let width = labels.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    report
        .entries()
        .iter()
        .zip(&labels)
        .map(|(entry, (label, path))| {
            let padded = format!("{:<width$}", label, width = width);
            let styled = if entry.large {
                theme.grew.apply_to(padded).to_string()
            } else {
                match entry.delta() {
                    SizeDelta::Large(_) => theme.error.apply_to(padded).to_string(),
                    SizeDelta::Grew(_) => theme.grew.apply_to(padded).to_string(),
                    SizeDelta::Shrank(_) => theme.shrank.apply_to(padded).to_string(),
                    SizeDelta::None => padded,
                }
            };
            let (dir, name) = match path.rsplit_once('/') {
                Some((dir, name)) => (format!("{}/{}/", output, dir), name),
                None => (format!("{}/", output), *path),
            };
            format!(
                "  {}  {}{}",
                styled,
                theme.dim.apply_to(dir),
                theme.path.apply_to(name)
            )
        })
        .collect()
}
