//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetPath;
use crate::error::{Error, Result};
use crate::mapping::{ComboMapping, DirectMapping, ExecMapping, GlobMapping, Mapping};

/// Source pattern of a direct mapping that matches every dataset.
pub const ANY_SOURCE: &str = "*";

/// Default name of the zfs binary, looked up in `PATH`.
pub const DEFAULT_ZFS_BINARY: &str = "zfs";

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use zrepl::config::{Config, MappingSpec};
///
/// let config: Config = serde_yaml::from_str(r#"
/// zfs_binary: /sbin/zfs
/// mapping:
///   type: glob
///   prefix: pool/home
///   target_root: backup
/// "#).unwrap();
///
/// assert_eq!(config.zfs().binary.to_str(), Some("/sbin/zfs"));
/// assert!(matches!(config.mapping, Some(MappingSpec::Glob { .. })));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the zfs binary used for enumeration.
    pub zfs_binary: Option<PathBuf>,

    /// The mapping applied to local datasets.
    pub mapping: Option<MappingSpec>,
}

impl Config {
    /// The enumeration settings derived from this configuration.
    #[must_use]
    pub fn zfs(&self) -> ZfsConfig {
        self.zfs_binary
            .clone()
            .map_or_else(ZfsConfig::default, |binary| ZfsConfig { binary })
    }

    /// Overlay `other` onto `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Config) {
        if other.zfs_binary.is_some() {
            self.zfs_binary = other.zfs_binary;
        }
        if other.mapping.is_some() {
            self.mapping = other.mapping;
        }
    }

    /// Check the configuration without starting any process.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if let Some(binary) = &self.zfs_binary {
            if binary.as_os_str().is_empty() {
                return Err(Error::Validation {
                    field: "zfs_binary".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(mapping) = &self.mapping {
            mapping.validate("mapping")?;
        }
        Ok(())
    }
}

/// Settings of the zfs enumeration tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZfsConfig {
    /// The binary to execute.
    pub binary: PathBuf,
}

impl Default for ZfsConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_ZFS_BINARY),
        }
    }
}

/// Declarative description of a [`Mapping`].
///
/// # Examples
///
/// ```
/// use zrepl::config::MappingSpec;
/// use zrepl::mapping::DatasetMapping;
///
/// let spec: MappingSpec = serde_yaml::from_str(r#"
/// type: combo
/// mappings:
///   - type: direct
///     source: pool/special
///     target: elsewhere
///   - type: glob
///     prefix: pool/
///     target_root: backup
/// "#).unwrap();
///
/// let mapping = spec.build().unwrap();
/// let target = mapping.map(&"pool/special".parse().unwrap()).unwrap();
/// assert_eq!(target.unwrap().to_string(), "elsewhere");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MappingSpec {
    /// One source (or `*` for any) to one target.
    Direct {
        /// The accepted source dataset, or `*`.
        source: String,
        /// The target dataset.
        target: String,
    },
    /// Re-root everything below a prefix. A trailing `/` on the prefix
    /// matches strict descendants only.
    Glob {
        /// The prefix a source must have.
        prefix: String,
        /// The root the source is appended to.
        target_root: String,
    },
    /// First match of an ordered list.
    Combo {
        /// The composed mappings in lookup order.
        mappings: Vec<MappingSpec>,
    },
    /// An external mapping process.
    Exec {
        /// The program to run.
        program: String,
        /// Arguments passed to the program.
        #[serde(default)]
        args: Vec<String>,
    },
}

impl MappingSpec {
    /// Construct the described mapping.
    ///
    /// External mapping processes are started here.
    ///
    /// # Errors
    ///
    /// Returns an error if a dataset name is invalid or an external process
    /// cannot be started.
    pub fn build(&self) -> Result<Mapping> {
        Ok(match self {
            Self::Direct { source, target } => {
                let target = DatasetPath::parse_non_empty(target)?;
                if source == ANY_SOURCE {
                    Mapping::Direct(DirectMapping::any(target))
                } else {
                    let source = DatasetPath::parse_non_empty(source)?;
                    Mapping::Direct(DirectMapping::new(source, target))
                }
            }
            Self::Glob {
                prefix,
                target_root,
            } => Mapping::Glob(GlobMapping::new(
                GlobMapping::parse_prefix(prefix)?,
                DatasetPath::parse(target_root)?,
            )),
            Self::Combo { mappings } => Mapping::Combo(ComboMapping::new(
                mappings
                    .iter()
                    .map(MappingSpec::build)
                    .collect::<Result<_>>()?,
            )),
            Self::Exec { program, args } => {
                Mapping::Exec(ExecMapping::spawn(program, args.as_slice())?)
            }
        })
    }

    fn validate(&self, field: &str) -> Result<()> {
        let invalid = |message: String| Error::Validation {
            field: field.to_string(),
            message,
        };

        match self {
            Self::Direct { source, target } => {
                if source != ANY_SOURCE {
                    DatasetPath::parse_non_empty(source).map_err(|e| invalid(e.to_string()))?;
                }
                DatasetPath::parse_non_empty(target).map_err(|e| invalid(e.to_string()))?;
            }
            Self::Glob {
                prefix,
                target_root,
            } => {
                GlobMapping::parse_prefix(prefix).map_err(|e| invalid(e.to_string()))?;
                DatasetPath::parse(target_root).map_err(|e| invalid(e.to_string()))?;
            }
            Self::Combo { mappings } => {
                for (i, mapping) in mappings.iter().enumerate() {
                    mapping.validate(&format!("{field}.mappings[{i}]"))?;
                }
            }
            Self::Exec { program, .. } => {
                if program.trim().is_empty() {
                    return Err(invalid("program must not be empty".to_string()));
                }
            }
        }
        Ok(())
    }
}
