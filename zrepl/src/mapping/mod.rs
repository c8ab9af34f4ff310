//! Translation of source dataset names into a destination namespace.
//!
//! Every mapping answers one question: given a source dataset, which dataset
//! should it be replicated to? The answer is `Ok(Some(target))`, or
//! `Ok(None)` if the mapping does not accept the source. Errors are reserved
//! for operational failures of the mapping itself, which only the
//! external-process variant can have.
//!
//! # Variants
//!
//! - [`DirectMapping`]: one fixed source (or any source) to one fixed target
//! - [`GlobMapping`]: every dataset below a prefix, re-rooted under a target
//! - [`ComboMapping`]: first match of an ordered list of mappings
//! - [`ExecMapping`]: decision delegated to a long-lived external process
//!
//! # Examples
//!
//! ```
//! use zrepl::mapping::{DatasetMapping, GlobMapping, Mapping};
//! use zrepl::DatasetPath;
//!
//! let mapping = Mapping::Glob(GlobMapping::new(
//!     "pool/home".parse().unwrap(),
//!     "backup".parse().unwrap(),
//! ));
//!
//! let source: DatasetPath = "pool/home/alice".parse().unwrap();
//! let target = mapping.map(&source).unwrap();
//! assert_eq!(target.unwrap().to_string(), "backup/pool/home/alice");
//! ```

mod combo;
mod direct;
mod exec;
mod glob;

use std::fmt;

use crate::dataset::DatasetPath;
use crate::error::Result;

pub use combo::ComboMapping;
pub use direct::{DirectMapping, DirectSource};
pub use exec::{ExecMapping, NO_MAP};
pub use glob::GlobMapping;

/// A function from source dataset to target dataset.
///
/// Implementations must be safe to share between threads. Implementations
/// backed by external state serialize their lookups internally.
pub trait DatasetMapping: Send + Sync {
    /// Map `source` into the destination namespace.
    ///
    /// Returns `Ok(None)` if this mapping does not accept `source`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the mapping could not reach a decision.
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>>;
}

/// Any of the available mapping strategies.
pub enum Mapping {
    /// See [`DirectMapping`].
    Direct(DirectMapping),
    /// See [`GlobMapping`].
    Glob(GlobMapping),
    /// See [`ComboMapping`].
    Combo(ComboMapping),
    /// See [`ExecMapping`].
    Exec(ExecMapping),
    /// A caller-provided strategy.
    Custom(Box<dyn DatasetMapping>),
}

impl DatasetMapping for Mapping {
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>> {
        match self {
            Self::Direct(m) => m.map(source),
            Self::Glob(m) => m.map(source),
            Self::Combo(m) => m.map(source),
            Self::Exec(m) => m.map(source),
            Self::Custom(m) => m.map(source),
        }
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(m) => f.debug_tuple("Direct").field(m).finish(),
            Self::Glob(m) => f.debug_tuple("Glob").field(m).finish(),
            Self::Combo(m) => f.debug_tuple("Combo").field(m).finish(),
            Self::Exec(m) => f.debug_tuple("Exec").field(m).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<DirectMapping> for Mapping {
    fn from(m: DirectMapping) -> Self {
        Self::Direct(m)
    }
}

impl From<GlobMapping> for Mapping {
    fn from(m: GlobMapping) -> Self {
        Self::Glob(m)
    }
}

impl From<ComboMapping> for Mapping {
    fn from(m: ComboMapping) -> Self {
        Self::Combo(m)
    }
}

impl From<ExecMapping> for Mapping {
    fn from(m: ExecMapping) -> Self {
        Self::Exec(m)
    }
}
