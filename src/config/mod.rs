//! Merge options
//!
//! Options are resolved from two layers:
//! 1. Built-in defaults (accepted extensions, stdout output)
//! 2. CLI flags

mod defaults;
mod options;

pub use defaults::{ANY_EXTENSION, DEFAULT_EXTENSIONS, STDOUT_MARKER};
pub use options::{ConfigError, ExtensionSet, MergeOptions, OutputTarget};
