mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;

use cli_args::Cli;
use code2md_core::{AppError, Config, TraversalPolicy};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);
    log::debug!("CLI args parsed: {:?}", cli_args);

    let quiet = cli_args.quiet;
    let exit_code = match run_app(cli_args) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            if !quiet || exit_code == 1 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::InvalidBasePath { .. }) => 1,
        Some(AppError::NoExtensions) => 1,
        Some(AppError::UnknownProjectType(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::DataLoading(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::Traversal(_)) => 2,
        Some(AppError::NoFilesFound(_)) => 3,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli) -> Result<()> {
    if cli.list_types {
        log::debug!("Listing project types...");
        return commands::list_types::handle_list_types_command();
    }

    // Validate the base directory before anything else touches the filesystem.
    let base_path = Config::determine_base_path(cli.directory.as_deref())
        .context("Failed to determine project directory")?;
    log::info!("Project directory determined: {}", base_path.display());

    let config = load_config_for_command(&base_path, &cli)?;
    commands::generate::handle_generate_command(&base_path, &config, cli.quiet, cli.verbose)
}

/// Loads the TOML config (if any) and layers the CLI flags on top.
pub fn load_config_for_command(base_path: &std::path::Path, cli: &Cli) -> Result<Config> {
    let config_path =
        Config::resolve_config_path(base_path, cli.config.as_deref(), cli.no_config)
            .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let mut config = merge_config_with_cli_overrides(config, cli);
    config.general.project_name = Some(config.get_effective_project_name(base_path));
    Ok(config)
}

fn merge_config_with_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(name) = &cli.name {
        config.general.project_name = Some(name.clone());
    }
    config.general.types.extend(cli.types.iter().cloned());
    config.general.extensions.extend(cli.extensions.iter().cloned());
    config.filters.exclude.extend(cli.excludes.iter().cloned());
    if cli.no_default_excludes {
        config.filters.use_default_excludes = false;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.clone());
    }
    if cli.no_tree {
        config.output.include_tree = false;
    }
    if cli.strict {
        config.traversal.policy = TraversalPolicy::FailFast;
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}
