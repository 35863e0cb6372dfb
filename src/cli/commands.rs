//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::LayoutService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::UnknownRelationPolicy;
use crate::infrastructure::{read_snapshot, InfraError};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Structure { file }) => cmd_structure(cli, file),
        Some(Commands::Layout {
            file,
            format,
            strict,
        }) => cmd_layout(cli, file, *format, *strict),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Cli::command()
            .print_help()
            .map_err(|e| CliError::from(InfraError::io("print help", e))),
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) if dir.is_dir() => Ok(dir.clone()),
        Some(dir) => Err(CliError::InvalidArgs(format!("not a directory: {}", dir.display()))),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e).into()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let settings = Settings::load(Some(&dir))?;
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(cli))]
fn cmd_structure(cli: &Cli, file: &Path) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let snapshot = read_snapshot(file)?;

    let structure = LayoutService::new(&settings).structure_snapshot(&snapshot)?;

    output::found(structure.roots().len(), "trees");
    for view in structure.views() {
        output::plain(&view.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_layout(cli: &Cli, file: &Path, format: Option<OutputFormat>, strict: bool) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    if strict {
        settings.unknown_relations = UnknownRelationPolicy::Reject;
    }
    let snapshot = read_snapshot(file)?;

    let layout = LayoutService::new(&settings).layout_snapshot(&snapshot)?;
    let views = layout.views();

    match format.unwrap_or(settings.output) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&views).map_err(InfraError::from)?;
            output::plain(&json);
        }
        OutputFormat::Tree => {
            output::found(views.len(), "root groups");
            for view in &views {
                output::plain(&view.to_tree_string());
            }
        }
    }
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::plain(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    let dir = config_dir(cli)?;
    let mut paths = Vec::new();
    if let Some(global) = global_config_path() {
        paths.push(("global", global));
    }
    paths.push(("local", local_config_path(&dir)));

    for (label, path) in paths {
        output::config_location(label, &path);
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
