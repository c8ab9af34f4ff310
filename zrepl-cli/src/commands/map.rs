//! Command to show the target a dataset maps to.

use crate::error::CliError;
use crate::utils::{build_mapping, load_configuration, parse_dataset, GlobalOptions};
use clap::Args;
use zrepl::DatasetMapping;

/// Apply the configured mapping to a dataset.
#[derive(Args)]
pub struct MapCommand {
    /// Source dataset to map
    #[arg(value_name = "DATASET")]
    pub dataset: String,
}

impl MapCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let source = parse_dataset(&self.dataset)?;

        let config = load_configuration(global)?;
        let mapping = build_mapping(&config)?;

        match mapping.map(&source)? {
            Some(target) => {
                println!("{target}");
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!("{source} is not mapped"))),
        }
    }
}
