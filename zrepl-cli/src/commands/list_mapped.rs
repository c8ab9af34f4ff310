//! Command to list local datasets accepted by the configured mapping.

use crate::error::CliError;
use crate::utils::{build_mapping, load_configuration, open_lister, GlobalOptions};
use clap::Args;
use zrepl::zfs::{list_mapped, DatasetLister};
use zrepl::DatasetMapping;

/// List every local dataset the configured mapping accepts.
#[derive(Args)]
pub struct ListMappedCommand {
    /// Also print the target each dataset maps to
    #[arg(long)]
    pub targets: bool,
}

impl ListMappedCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let lister = open_lister(&config);
        let mapping = build_mapping(&config)?;

        if !self.targets {
            for source in list_mapped(&lister, &mapping)? {
                println!("{source}");
            }
            return Ok(());
        }

        for source in lister.list_datasets()? {
            if let Some(target) = mapping.map(&source)? {
                println!("{source}\t{target}");
            }
        }

        Ok(())
    }
}
