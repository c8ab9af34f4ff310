//! Layered construction of the effective configuration.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::schema::Config;
use crate::error::Result;

/// Builds the effective configuration.
///
/// Precedence, highest first:
///
/// 1. Programmatic overrides ([`with_config`](Self::with_config))
/// 2. Environment variables (`ZREPL_*`)
/// 3. The configuration file
/// 4. Built-in defaults
///
/// # Examples
///
/// ```
/// use zrepl::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         zfs_binary: Some("/sbin/zfs".into()),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.zfs().binary.to_str(), Some("/sbin/zfs"));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// A builder with all sources enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of the user configuration.
    #[must_use]
    pub fn with_file(mut self, path: &Path) -> Self {
        self.file = Some(path.to_path_buf());
        self
    }

    /// Ignore configuration files.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignore environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Apply `config` on top of every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merge all sources and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be loaded or the merged
    /// configuration is invalid.
    pub fn build(self) -> Result<Config> {
        let mut config = if self.skip_files {
            Config::default()
        } else {
            ConfigLoader::load(self.file.as_deref())?
        };

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(overrides) = self.overrides {
            config.merge(overrides);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::ZFS_BINARY_VAR;
    use serial_test::serial;
    use std::env;
    use std::fs;

    #[test]
    fn test_defaults_only() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_precedence() {
        let saved = env::var(ZFS_BINARY_VAR).ok();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "zfs_binary: /from/file\n").unwrap();

        env::remove_var(ZFS_BINARY_VAR);
        let config = ConfigBuilder::new().with_file(&file).build().unwrap();
        assert_eq!(config.zfs_binary, Some(PathBuf::from("/from/file")));

        env::set_var(ZFS_BINARY_VAR, "/from/env");
        let config = ConfigBuilder::new().with_file(&file).build().unwrap();
        assert_eq!(config.zfs_binary, Some(PathBuf::from("/from/env")));

        let config = ConfigBuilder::new()
            .with_file(&file)
            .with_config(Config {
                zfs_binary: Some(PathBuf::from("/from/override")),
                mapping: None,
            })
            .build()
            .unwrap();
        assert_eq!(config.zfs_binary, Some(PathBuf::from("/from/override")));

        match saved {
            Some(val) => env::set_var(ZFS_BINARY_VAR, val),
            None => env::remove_var(ZFS_BINARY_VAR),
        }
    }

    #[test]
    fn test_invalid_result_rejected() {
        let result = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                zfs_binary: None,
                mapping: Some(crate::config::MappingSpec::Exec {
                    program: String::new(),
                    args: Vec::new(),
                }),
            })
            .build();
        assert!(result.is_err());
    }
}
