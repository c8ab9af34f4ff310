//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, DiffCommand, ExistsCommand, ListMappedCommand, MapCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for inspecting ZFS replication plans.
#[derive(Parser)]
#[command(name = "zrepl")]
#[command(version, about = "Inspect ZFS replication plans and dataset mappings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Read configuration from this file instead of ~/.zrepl/config.yaml
    #[arg(long, value_name = "PATH", global = true, env = "ZREPL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path of the zfs binary used for enumeration
    #[arg(long, value_name = "PATH", global = true, env = "ZREPL_ZFS_BINARY")]
    pub zfs_binary: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show the target a dataset maps to
    Map(MapCommand),

    /// List local datasets accepted by the configured mapping
    ListMapped(ListMappedCommand),

    /// Check whether datasets exist locally
    Exists(ExistsCommand),

    /// Compare the version histories of a receiver and a sender filesystem
    Diff(DiffCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
