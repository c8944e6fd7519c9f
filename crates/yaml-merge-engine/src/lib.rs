//! Deep-merge engine for YAML document trees.
//!
//! Documents are folded into a single destination mapping:
//! - Mappings: merged recursively by key
//! - Sequences: APPENDED (source elements after existing ones)
//! - Scalars: override (last writer wins, null included)
//!
//! An optional [`KeyFilter`] is checked at every nesting level. Keys that
//! do not match a regular expression are pruned; a non-matching mapping
//! key survives only as the path to matching descendants.

mod filter;
mod merge;
mod node;

pub use filter::{FilterError, KeyFilter};
pub use merge::{merge, merge_all};
pub use node::{Mapping, Node, Scalar};
