//! Command to check whether datasets exist locally.

use crate::error::CliError;
use crate::utils::{load_configuration, open_lister, parse_dataset, GlobalOptions};
use clap::Args;
use zrepl::zfs::FilesystemExistence;

/// Check whether datasets exist locally.
///
/// Datasets are enumerated once; every argument is answered from that
/// snapshot of the local namespace.
#[derive(Args)]
pub struct ExistsCommand {
    /// Datasets to check
    #[arg(value_name = "DATASET", required = true)]
    pub datasets: Vec<String>,

    /// Fail with exit code 1 unless every dataset exists
    #[arg(long)]
    pub all: bool,
}

impl ExistsCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let datasets = self
            .datasets
            .iter()
            .map(|d| parse_dataset(d))
            .collect::<Result<Vec<_>, _>>()?;

        let config = load_configuration(global)?;
        let existence = FilesystemExistence::build(&open_lister(&config))?;

        let mut missing = 0;
        for dataset in &datasets {
            let exists = existence.exists(dataset);
            if !exists {
                missing += 1;
            }
            println!("{dataset} {}", if exists { "yes" } else { "no" });
        }

        if self.all && missing > 0 {
            return Err(CliError::SemanticFailure(format!(
                "{missing} dataset(s) do not exist"
            )));
        }
        Ok(())
    }
}
