//! yaml-merge - recursive YAML document merger
//!
//! Discovers YAML files from paths and directory trees, folds them into a
//! single document with the deep-merge engine, and writes the result.

pub mod config;
pub mod document;
pub mod pipeline;
pub mod source;

pub use config::{ConfigError, ExtensionSet, MergeOptions, OutputTarget};
pub use document::{DocumentError, LoadedDocument};
pub use pipeline::{execute, run, MergeOutcome, MergeReport, PipelineError};
pub use yaml_merge_engine::{merge, FilterError, KeyFilter, Mapping, Node, Scalar};
