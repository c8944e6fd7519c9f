//! Input discovery
//!
//! Resolves the path arguments into the ordered list of files to merge.
//! Files named directly are checked against the extension set; directories
//! are walked recursively (sorted by file name, symlinks not followed) and
//! every regular file found gets the same check.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ExtensionSet;

/// Errors for input discovery
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of resolving the path arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Files to merge, in merge order
    pub files: Vec<PathBuf>,

    /// Files rejected by the extension check
    pub skipped: Vec<PathBuf>,
}

impl Discovery {
    fn consider(&mut self, path: PathBuf, extensions: &ExtensionSet) {
        if extensions.accepts(&path) {
            self.files.push(path);
        } else {
            debug!(
                "Skipping file {} not matching extensions {}",
                path.display(),
                extensions
            );
            self.skipped.push(path);
        }
    }
}

/// Resolve path arguments into files, preserving argument order
pub fn discover(inputs: &[PathBuf], extensions: &ExtensionSet) -> Result<Discovery, SourceError> {
    let mut discovery = Discovery::default();

    for input in inputs {
        if input.is_file() {
            discovery.consider(input.clone(), extensions);
        } else if input.is_dir() {
            info!("Traversing directory structure {}", input.display());
            walk_directory(input, extensions, &mut discovery)?;
        } else {
            return Err(SourceError::NotFound(input.clone()));
        }
    }

    Ok(discovery)
}

fn walk_directory(
    root: &Path,
    extensions: &ExtensionSet,
    discovery: &mut Discovery,
) -> Result<(), SourceError> {
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        // Symlinked files count when they resolve to a regular file
        if entry.path().is_file() {
            discovery.consider(entry.into_path(), extensions);
        }
    }
    Ok(())
}
