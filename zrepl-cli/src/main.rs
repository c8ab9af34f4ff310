//! Main entry point for the zrepl CLI.
//!
//! This is the command-line interface for inspecting replication plans.
//! It provides commands for:
//! - `map`: Show where a dataset would be replicated to
//! - `list-mapped`: List local datasets accepted by the mapping
//! - `exists`: Check whether datasets exist locally
//! - `diff`: Compare the version histories of two filesystems
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Route library diagnostics to stderr based on verbosity
    if let Err(e) = zrepl::init_logger(cli.verbose, cli.quiet).install() {
        eprintln!("Error: cannot install logger: {e}");
    }

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        zfs_binary: cli.zfs_binary,
    };

    let result = match cli.command {
        cli::Command::Map(cmd) => cmd.execute(&global),
        cli::Command::ListMapped(cmd) => cmd.execute(&global),
        cli::Command::Exists(cmd) => cmd.execute(&global),
        cli::Command::Diff(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
