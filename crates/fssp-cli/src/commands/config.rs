//! Configuration file commands
//!
//! Every search can be described by a [`RunConfig`]; the flag-driven
//! commands build one, `fssp run` loads one, and either can write it back.

use std::path::Path;

use colored::Colorize;

use fssp_core::RunConfig;
use fssp_fs::ConfigStore;

use crate::cli::OutputArgs;
use crate::display_path;
use crate::error::Result;

/// Run the search described by a configuration file
pub fn run_config(dir: &Path, path: &Path, output: &OutputArgs) -> Result<()> {
    let config: RunConfig = ConfigStore::new().load(path)?;
    tracing::debug!(path = %path.display(), name = %config.name(), "loaded run configuration");
    run(dir, &config, output)
}

/// Save the configuration when asked to, then run it
pub fn run(dir: &Path, config: &RunConfig, output: &OutputArgs) -> Result<()> {
    if let Some(path) = &output.save_config {
        save_config(path, config)?;
    }
    match config {
        RunConfig::Ring(config) => super::run_ring(dir, config, output),
        RunConfig::ExpRing(config) => super::run_exp_ring(dir, config, output),
        RunConfig::Embed(config) => super::run_embed(config),
    }
}

/// Write a configuration file, choosing the format by extension
pub fn save_config(path: &Path, config: &RunConfig) -> Result<()> {
    ConfigStore::new().save(path, config)?;
    println!("{} configuration saved to {}", "=>".blue().bold(), display_path(path));
    Ok(())
}
