//! Command dispatch and handlers

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{BatchReport, LookupOutcome, UpdateStatus};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::KeyPath;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub const PATH_PROMPT: &str = "Enter the path (e.g., notifications.new-results.newfield): ";
pub const VALUE_PROMPT: &str = "Enter the value: ";

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Get { path }) => {
            let container = ServiceContainer::new(resolve_settings(cli)?);
            cmd_get(&container, path)
        }
        Some(Commands::Set { path, value }) => {
            let container = ServiceContainer::new(resolve_settings(cli)?);
            cmd_set(&container, path.as_deref(), value.as_deref())
        }
        None => {
            let container = ServiceContainer::new(resolve_settings(cli)?);
            cmd_set(&container, None, None)
        }
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    let cwd = env::current_dir()
        .map_err(|e| InfraError::io("cannot determine current directory", e))?;
    Ok(match &cli.project_dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Layered settings with command line flags applied last.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let project = project_dir(cli)?;
    let mut settings = Settings::load(Some(&project))?;
    apply_cli_overrides(&mut settings, cli, &project);
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli, project: &Path) {
    if let Some(dir) = &cli.dir {
        settings.translations_dir = dir.clone();
    }
    if !cli.extensions.is_empty() {
        settings.extensions = cli.extensions.clone();
    }
    if let Some(locale) = &cli.locale {
        settings.sort_locale = locale.clone();
    }
    if cli.fail_fast {
        settings.fail_fast = true;
    }
    settings.normalize(Some(project));
}

/// Set a value in every locale file, prompting for what was not given.
#[instrument(skip(container, value))]
pub fn cmd_set(container: &ServiceContainer, path: Option<&str>, value: Option<&str>) -> CliResult<()> {
    let raw_path = match path {
        Some(p) => p.to_string(),
        None => container.ask(PATH_PROMPT)?,
    };
    let key_path = KeyPath::parse(raw_path.trim()).map_err(ApplicationError::from)?;

    let value = match value {
        Some(v) => v.to_string(),
        None => container.ask(VALUE_PROMPT)?,
    };

    let service = container.translation_service()?;
    let dir = &container.settings.translations_dir;
    let report = service.update_all(dir, &key_path, &value)?;

    print_report(&report, dir);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            failed: report.failed.len(),
            total: report.total(),
        })
    }
}

fn print_report(report: &BatchReport, dir: &Path) {
    if report.total() == 0 {
        output::warning(&format!("no locale files found in {}", dir.display()));
        return;
    }

    for update in &report.updated {
        match update.status {
            UpdateStatus::Unchanged if !update.written => {
                output::detail(&format!("{} (unchanged)", update.path.display()));
            }
            status => output::success(&format!("{} ({})", update.path.display(), status)),
        }
    }
    for failure in &report.failed {
        output::failure(&format!("{}: {}", failure.path.display(), failure.error));
    }
    for skipped in &report.skipped {
        output::detail(&format!("{} (skipped)", skipped.display()));
    }
}

/// Show the value at `path` in every locale file.
pub fn cmd_get(container: &ServiceContainer, path: &str) -> CliResult<()> {
    let key_path = KeyPath::parse(path.trim()).map_err(ApplicationError::from)?;
    let service = container.translation_service()?;
    let lookups = service.lookup_all(&container.settings.translations_dir, &key_path)?;

    let total = lookups.len();
    let mut failed = 0;
    for lookup in &lookups {
        let file = lookup.path.display();
        match &lookup.outcome {
            LookupOutcome::Found(scalar) => output::action(&file.to_string(), scalar.as_str()),
            LookupOutcome::NotALeaf => output::detail(&format!("{file}: has children")),
            LookupOutcome::Missing => output::detail(&format!("{file}: missing")),
            LookupOutcome::Failed(error) => {
                failed += 1;
                output::failure(&format!("{file}: {error}"));
            }
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::BatchFailed { failed, total })
    }
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            let project = project_dir(cli)?;
            match global_config_path() {
                Some(path) => print_config_path("global", &path),
                None => output::detail("global: (no config directory)"),
            }
            print_config_path("local", &local_config_path(&project));
        }
    }
    Ok(())
}

fn print_config_path(label: &str, path: &Path) {
    if path.exists() {
        output::success(&format!("{label}: {}", path.display()));
    } else {
        output::detail(&format!("{label}: {} (not found)", path.display()));
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
