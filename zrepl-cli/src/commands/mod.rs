//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `map`: Show the target a dataset maps to
//! - `list_mapped`: List local datasets accepted by the mapping
//! - `exists`: Check whether datasets exist locally
//! - `diff`: Compare receiver and sender version histories
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod diff;
pub mod exists;
pub mod list_mapped;
pub mod map;

pub use completions::CompletionsCommand;
pub use diff::DiffCommand;
pub use exists::ExistsCommand;
pub use list_mapped::ListMappedCommand;
pub use map::MapCommand;
