//! Test fixtures for merge scenarios
//!
//! - `scenario/`: two overlapping documents (scalar override + sequence append)
//! - `conf.d/`: a directory tree merged in file-name order
//! - `base.yaml` / `overlay.yaml`: base-seeded merge
//! - `filter.yaml`: key filter pruning

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use yaml_merge::{document, Mapping};

/// Path to a fixture file or directory
pub fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(rel)
}

/// Parse a single YAML document for comparisons
pub fn yaml(text: &str) -> Mapping {
    let mut docs = document::parse_documents(text, Path::new("<expected>"))
        .expect("expected document should parse");
    assert_eq!(docs.len(), 1, "expected exactly one document");
    docs.remove(0)
}
