//! Environment variable handling for configuration overrides.

use std::env;
use std::path::PathBuf;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Overrides the zfs binary.
pub const ZFS_BINARY_VAR: &str = "ZREPL_ZFS_BINARY";

/// Handles `ZREPL_*` environment variable overrides.
///
/// # Examples
///
/// ```no_run
/// use zrepl::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(binary) = env::var(ZFS_BINARY_VAR) {
            if binary.trim().is_empty() {
                return Err(Error::Validation {
                    field: ZFS_BINARY_VAR.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.zfs_binary = Some(PathBuf::from(binary));
        }
        Ok(())
    }
}
