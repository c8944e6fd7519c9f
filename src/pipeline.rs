//! Pipeline orchestration
//!
//! Runs one merge from options to output:
//! - Validate options and compile the key filter
//! - Seed the destination (empty, or the base document)
//! - Discover input files
//! - Load and merge each document in order
//! - Write the merged document, or the report on a dry run
//!
//! Every failure is fatal to the run; nothing is written unless the merged
//! document holds at least one key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use yaml_merge_engine::{merge, KeyFilter, Mapping};

use crate::config::{ConfigError, MergeOptions, OutputTarget};
use crate::document::{self, DocumentError, LoadedDocument};
use crate::source::{self, SourceError};

/// Schema version for the merge report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("No merged data")]
    EmptyResult,
}

/// A file that contributed to the merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub path: String,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,

    /// Number of non-empty top-level documents in the file
    pub documents: usize,
}

impl SourceRecord {
    fn from_loaded(loaded: &LoadedDocument) -> Self {
        Self {
            path: loaded.path.to_string_lossy().to_string(),
            digest: loaded.digest.clone(),
            documents: loaded.documents.len(),
        }
    }
}

/// Provenance of a merge run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub schema_version: u32,

    /// When the merge ran
    pub created_at: DateTime<Utc>,

    /// Document seeding the destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<SourceRecord>,

    /// Merged files in merge order
    pub sources: Vec<SourceRecord>,

    /// Files rejected by the extension check
    pub skipped: Vec<String>,

    /// Key filter pattern, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Top-level keys of the merged document
    pub top_level_keys: Vec<String>,
}

impl MergeReport {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Merged document plus its provenance
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Mapping,
    pub report: MergeReport,
}

/// Merge all inputs without writing anything
pub fn run(options: &MergeOptions) -> Result<MergeOutcome, PipelineError> {
    let filter = options.validate()?;

    let (mut destination, base) = match &options.base {
        Some(path) => seed_from_base(path)?,
        None => (Mapping::new(), None),
    };

    let discovery = source::discover(&options.inputs, &options.extensions)?;

    let mut sources = Vec::with_capacity(discovery.files.len());
    for path in &discovery.files {
        sources.push(merge_file(path, &mut destination, filter.as_ref())?);
    }

    if destination.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    let report = MergeReport {
        schema_version: REPORT_SCHEMA_VERSION,
        created_at: Utc::now(),
        base,
        sources,
        skipped: discovery
            .skipped
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        filter: filter.as_ref().map(|f| f.pattern().to_string()),
        top_level_keys: destination.keys().cloned().collect(),
    };

    Ok(MergeOutcome {
        document: destination,
        report,
    })
}

/// Merge all inputs and write the result (or the report, on a dry run)
pub fn execute(options: &MergeOptions) -> Result<MergeOutcome, PipelineError> {
    let outcome = run(options)?;

    if options.dry_run {
        info!("Dry run: not writing merged document");
        let json = outcome.report.to_json()?;
        write_stdout(&format!("{}\n", json))?;
    } else {
        let text = document::render(&outcome.document)?;
        write_output(&options.output, &text)?;
    }

    Ok(outcome)
}

/// The base document is the destination itself, so the key filter does not apply
fn seed_from_base(path: &Path) -> Result<(Mapping, Option<SourceRecord>), PipelineError> {
    info!("Seeding from base document {}", path.display());
    let loaded = LoadedDocument::load(path)?;
    debug!("{} sha256 {}", path.display(), loaded.digest);

    let record = SourceRecord::from_loaded(&loaded);
    let mut destination = Mapping::new();
    for doc in &loaded.documents {
        merge(doc, &mut destination, None);
    }
    Ok((destination, Some(record)))
}

fn merge_file(
    path: &Path,
    destination: &mut Mapping,
    filter: Option<&KeyFilter>,
) -> Result<SourceRecord, PipelineError> {
    info!("Merging file {}", path.display());
    let loaded = LoadedDocument::load(path)?;
    debug!(
        "{} sha256 {} ({} documents)",
        path.display(),
        loaded.digest,
        loaded.documents.len()
    );
    if loaded.is_empty() {
        debug!("{} holds no data", path.display());
    }

    for doc in &loaded.documents {
        merge(doc, destination, filter);
    }
    Ok(SourceRecord::from_loaded(&loaded))
}

fn write_output(target: &OutputTarget, text: &str) -> Result<(), PipelineError> {
    match target {
        OutputTarget::Stdout => write_stdout(text),
        OutputTarget::File(path) => {
            info!("Writing merged document to {}", path.display());
            fs::write(path, text).map_err(|source| PipelineError::Output {
                path: path.clone(),
                source,
            })
        }
    }
}

fn write_stdout(text: &str) -> Result<(), PipelineError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|source| PipelineError::Output {
            path: PathBuf::from("-"),
            source,
        })
}
