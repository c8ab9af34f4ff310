//! Enumeration through the `zfs` command line tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::ZfsConfig;
use crate::dataset::{DatasetPath, FilesystemVersion};
use crate::error::{Error, Result};

use super::DatasetLister;

/// Runs `zfs list` in scripted mode and parses its output.
///
/// # Examples
///
/// ```no_run
/// use zrepl::config::ZfsConfig;
/// use zrepl::zfs::{DatasetLister, ZfsCli};
///
/// let zfs = ZfsCli::new(&ZfsConfig::default());
/// for dataset in zfs.list_datasets().unwrap() {
///     println!("{dataset}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ZfsCli {
    binary: PathBuf,
}

impl ZfsCli {
    /// Create a lister using the configured binary.
    #[must_use]
    pub fn new(config: &ZfsConfig) -> Self {
        Self {
            binary: config.binary.clone(),
        }
    }

    /// The binary that is executed.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run `zfs list -H -p -o <properties> <args>` and split the output.
    ///
    /// Each returned row has exactly one field per requested property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Zfs`] with the tool's stderr if it exits with a
    /// non-zero status, or [`Error::UnparsableZfsOutput`] if a row does not
    /// have the expected number of fields.
    pub fn list(&self, properties: &[&str], args: &[&str]) -> Result<Vec<Vec<String>>> {
        let mut command = Command::new(&self.binary);
        command
            .arg("list")
            .arg("-H")
            .arg("-p")
            .arg("-o")
            .arg(properties.join(","))
            .args(args);

        let command_line = format!("{command:?}");
        log::debug!("running {command_line}");

        let output = command.output()?;
        if !output.status.success() {
            return Err(Error::Zfs {
                command: command_line,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| Error::UnparsableZfsOutput {
            line: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            reason: "output is not valid UTF-8".to_string(),
        })?;

        stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
                if fields.len() == properties.len() {
                    Ok(fields)
                } else {
                    Err(Error::UnparsableZfsOutput {
                        line: line.to_string(),
                        reason: format!(
                            "expected {} field(s), found {}",
                            properties.len(),
                            fields.len()
                        ),
                    })
                }
            })
            .collect()
    }
}

impl DatasetLister for ZfsCli {
    fn list_datasets(&self) -> Result<Vec<DatasetPath>> {
        self.list(&["name"], &["-r", "-t", "filesystem,volume"])?
            .iter()
            .map(|row| DatasetPath::parse(&row[0]))
            .collect()
    }

    fn list_versions(&self, filesystem: &DatasetPath) -> Result<Vec<FilesystemVersion>> {
        let name = filesystem.to_string();
        let rows = self.list(
            &["name", "guid", "createtxg"],
            &["-r", "-d", "1", "-t", "snapshot,bookmark", &name],
        )?;

        let mut versions = Vec::with_capacity(rows.len());
        for row in rows {
            let create_txg = row[2].parse().map_err(|_| Error::UnparsableZfsOutput {
                line: row.join("\t"),
                reason: format!("invalid createtxg '{}'", row[2]),
            })?;
            let (dataset, version) =
                FilesystemVersion::parse_full_name(&row[0], row[1].as_str(), create_txg)?;
            if dataset != name {
                return Err(Error::UnparsableZfsOutput {
                    line: row.join("\t"),
                    reason: format!("version does not belong to {name}"),
                });
            }
            versions.push(version);
        }

        // a snapshot precedes its own bookmarks
        versions.sort_by_key(|v| (v.create_txg, v.version_type));
        Ok(versions)
    }
}
