//! Configuration for zrepl.
//!
//! Configuration is read from a YAML file (by default
//! `~/.zrepl/config.yaml`), overridden by `ZREPL_*` environment variables
//! and finally by programmatic overrides.
//!
//! ```yaml
//! zfs_binary: /sbin/zfs
//! mapping:
//!   type: combo
//!   mappings:
//!     - type: direct
//!       source: pool/special
//!       target: backup/special
//!     - type: glob
//!       prefix: pool/
//!       target_root: backup
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod schema;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::ConfigLoader;
pub use schema::{Config, MappingSpec, ZfsConfig};
