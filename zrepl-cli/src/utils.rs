//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, lister and mapping construction, and
//! argument parsing.

use crate::error::CliError;
use std::path::PathBuf;
use zrepl::zfs::ZfsCli;
use zrepl::{Config, ConfigBuilder, DatasetPath, Mapping};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose only feeds the logger set up in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,

    /// Override the zfs binary.
    pub zfs_binary: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration file (`--config` or `~/.zrepl/config.yaml`)
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();

    if let Some(path) = &global.config {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        builder = builder.with_file(path);
    }

    if let Some(binary) = &global.zfs_binary {
        builder = builder.with_config(Config {
            zfs_binary: Some(binary.clone()),
            mapping: None,
        });
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Create the zfs lister described by `config`.
pub fn open_lister(config: &Config) -> ZfsCli {
    ZfsCli::new(&config.zfs())
}

/// Build the configured mapping.
///
/// External mapping processes are started here.
pub fn build_mapping(config: &Config) -> Result<Mapping, CliError> {
    let spec = config
        .mapping
        .as_ref()
        .ok_or_else(|| CliError::Config("no mapping configured".to_string()))?;
    Ok(spec.build()?)
}

/// Parse a dataset name given on the command line.
pub fn parse_dataset(input: &str) -> Result<DatasetPath, CliError> {
    DatasetPath::parse(input).map_err(|e| CliError::InvalidArguments(e.to_string()))
}
