//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Directory below the home directory holding the user configuration.
pub const USER_CONFIG_DIR: &str = ".zrepl";

/// File name of the user configuration.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use zrepl::config::ConfigLoader;
///
/// let config = ConfigLoader::load(None).unwrap();
/// println!("zfs binary: {}", config.zfs().binary.display());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration.
    ///
    /// An explicitly given file must exist. Without one, the user
    /// configuration at `~/.zrepl/config.yaml` is used if present, and the
    /// defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed, or
    /// if an explicit file does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let path = Self::user_config_path()?;
        if !path.exists() {
            log::debug!("no configuration at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_file(&path)
    }

    /// Load and parse a single YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Config> {
        log::debug!("loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Path of the user configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn user_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or_else(|| Error::Validation {
            field: "home".to_string(),
            message: "cannot determine home directory".to_string(),
        })?;
        Ok(home.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }
}
