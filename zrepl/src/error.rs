//! Error types for the zrepl library.
//!
//! This module provides the error hierarchy for the replication planning
//! core and its collaborators, using `thiserror` for ergonomic error handling.
//!
//! Note that a mapping which does not accept a dataset is not an error: every
//! mapping reports that outcome as `Ok(None)`. The variants below are
//! reserved for genuine operational failures.

use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for operations that may fail with a zrepl error.
///
/// # Examples
///
/// ```
/// use zrepl::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the zrepl library.
#[derive(Debug, Error)]
pub enum Error {
    /// A dataset path could not be constructed.
    #[error("invalid dataset path '{input}': {reason}")]
    InvalidDatasetPath {
        /// The rejected input.
        input: String,
        /// The reason the input was rejected.
        reason: String,
    },

    /// The zfs tool exited with a non-zero status.
    #[error("{command} failed ({}): {}", status_display(.status), .stderr.trim_end())]
    Zfs {
        /// The command line that was executed.
        command: String,
        /// The exit code, if the process was not killed by a signal.
        status: Option<i32>,
        /// Everything the tool wrote to stderr.
        stderr: String,
    },

    /// The zfs tool produced output that could not be interpreted.
    #[error("unparsable zfs output '{line}': {reason}")]
    UnparsableZfsOutput {
        /// The offending output line.
        line: String,
        /// Why the line was rejected.
        reason: String,
    },

    /// The external mapping process could not be started.
    #[error("cannot start mapping process '{program}': {source}")]
    MappingSpawn {
        /// The program that failed to start.
        program: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the external mapping process failed.
    #[error("mapping process I/O error: {0}")]
    MappingIo(#[source] std::io::Error),

    /// The external mapping process closed its output before answering.
    #[error("unexpected end of output from mapping process '{program}'")]
    MappingEndOfStream {
        /// The mapping program.
        program: String,
    },

    /// The external mapping process has terminated; the mapping is unusable.
    #[error("mapping process '{program}' exited: {status}")]
    MappingProcessExited {
        /// The mapping program.
        program: String,
        /// How the process terminated.
        status: ExitStatus,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_display(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Check if the error originates from an external mapping process.
    ///
    /// Such errors render the mapping instance unusable; callers must
    /// build a new mapping to continue.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::Error;
    ///
    /// let err = Error::MappingEndOfStream { program: "mapper".to_string() };
    /// assert!(err.is_mapping_failure());
    /// ```
    #[must_use]
    pub fn is_mapping_failure(&self) -> bool {
        matches!(
            self,
            Self::MappingSpawn { .. }
                | Self::MappingIo(_)
                | Self::MappingEndOfStream { .. }
                | Self::MappingProcessExited { .. }
        )
    }
}
