//! Command to compare the version histories of two filesystems.

use crate::error::CliError;
use crate::utils::{load_configuration, open_lister, parse_dataset, GlobalOptions};
use clap::Args;
use zrepl::zfs::DatasetLister;
use zrepl::{FilesystemDiff, FilesystemVersion};

/// Compare a receiver's history against a sender's.
///
/// Prints the classification and, for incremental replication, the
/// versions the sender would replay on top of the receiver.
#[derive(Args)]
pub struct DiffCommand {
    /// Receiving filesystem (may have no versions yet)
    #[arg(value_name = "RECEIVER")]
    pub receiver: String,

    /// Sending filesystem
    #[arg(value_name = "SENDER")]
    pub sender: String,

    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail with exit code 1 unless incremental replication is possible
    #[arg(long)]
    pub require_incremental: bool,
}

impl DiffCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let receiver = parse_dataset(&self.receiver)?;
        let sender = parse_dataset(&self.sender)?;

        let config = load_configuration(global)?;
        let lister = open_lister(&config);

        let left = lister.list_versions(&receiver)?;
        let right = lister.list_versions(&sender)?;
        if right.is_empty() {
            return Err(CliError::SemanticFailure(format!(
                "{sender} has no snapshots or bookmarks"
            )));
        }

        let diff = FilesystemDiff::compute(&left, &right);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        } else {
            print_diff(&diff, global.quiet);
        }

        if self.require_incremental && diff.incremental_path().is_none() {
            return Err(CliError::SemanticFailure(format!(
                "{receiver} cannot be updated incrementally from {sender}: {}",
                diff.conflict()
            )));
        }
        Ok(())
    }
}

fn print_diff(diff: &FilesystemDiff, quiet: bool) {
    println!("{}", diff.conflict());
    if quiet {
        return;
    }

    if let Some(path) = diff.incremental_path() {
        if diff.is_up_to_date() {
            println!("up to date at {}", path[0]);
        }
        for (from, to) in diff.steps() {
            println!("  {} -> {}", from.relative_name(), to.relative_name());
        }
    } else if let Some((left, right)) = diff.mrca_paths() {
        print_versions("receiver", left);
        print_versions("sender", right);
    }
}

fn print_versions(label: &str, versions: &[FilesystemVersion]) {
    println!("{label}:");
    for version in versions {
        println!("  {version}");
    }
}
