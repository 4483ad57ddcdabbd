//! fssp CLI
//!
//! Command-line front end for the firing squad rule table searches.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use fssp_core::RunConfig;

use cli::{Cli, Commands, OutputArgs};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialize logging: {e}")))?;
    tracing::debug!("verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Ring(args) => {
            let cwd = std::env::current_dir()?;
            commands::run(&cwd, &RunConfig::Ring(args.to_config()?), &args.output)
        }
        Commands::ExpRing(args) => {
            let cwd = std::env::current_dir()?;
            commands::run(&cwd, &RunConfig::ExpRing(args.to_config()?), &args.output)
        }
        Commands::Embed(args) => {
            let cwd = std::env::current_dir()?;
            let output = OutputArgs {
                save_config: args.save_config.clone(),
                ..OutputArgs::default()
            };
            commands::run(&cwd, &RunConfig::Embed(args.to_config()?), &output)
        }
        Commands::Run { config, output } => {
            let cwd = std::env::current_dir()?;
            commands::run_config(&cwd, &config, &output)
        }
        Commands::Show { file, index } => commands::run_show(&file, index),
        Commands::Simulate {
            table,
            ring,
            max_steps,
        } => commands::run_simulate(&table, &ring, max_steps),
    }
}

/// Print a path relative to the working directory when possible.
pub(crate) fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}
