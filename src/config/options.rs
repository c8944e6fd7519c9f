//! Validated merge options (layer 2: CLI flags)

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use yaml_merge_engine::{FilterError, KeyFilter};

use super::defaults::{ANY_EXTENSION, DEFAULT_EXTENSIONS, STDOUT_MARKER};

/// Configuration errors, reported before any file is read
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no input files or directories given")]
    NoInputs,

    #[error("invalid extension '{0}'")]
    InvalidExtension(String),

    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
}

/// Which file extensions take part in a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSet {
    /// Every regular file is accepted
    Any,
    /// Only files whose extension (without the leading dot) is listed
    Only(BTreeSet<String>),
}

impl Default for ExtensionSet {
    fn default() -> Self {
        ExtensionSet::Only(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl ExtensionSet {
    /// Build from `--extension` values.
    ///
    /// No values means the defaults; a literal `any` anywhere in the list
    /// disables filtering. A leading dot is accepted and stripped.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Ok(Self::default());
        }

        let mut accepted = BTreeSet::new();
        for value in values {
            let value = value.as_ref();
            if value == ANY_EXTENSION {
                return Ok(ExtensionSet::Any);
            }
            let normalized = value.trim_start_matches('.');
            if normalized.is_empty() {
                return Err(ConfigError::InvalidExtension(value.to_string()));
            }
            accepted.insert(normalized.to_string());
        }
        Ok(ExtensionSet::Only(accepted))
    }

    /// Whether a file path passes the extension check
    pub fn accepts(&self, path: &Path) -> bool {
        match self {
            ExtensionSet::Any => true,
            ExtensionSet::Only(accepted) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| accepted.contains(e)),
        }
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionSet::Any => write!(f, "{}", ANY_EXTENSION),
            ExtensionSet::Only(accepted) => {
                let list: Vec<&str> = accepted.iter().map(String::as_str).collect();
                write!(f, "[{}]", list.join(", "))
            }
        }
    }
}

/// Where the merged document goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Parse an `--output` value; `-` means stdout
    pub fn parse(value: &str) -> Self {
        if value == STDOUT_MARKER {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(value))
        }
    }
}

/// Options for one merge run
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Files and directories, in merge order
    pub inputs: Vec<PathBuf>,

    /// Accepted file extensions
    pub extensions: ExtensionSet,

    /// Key filter pattern (search semantics, applied at every level)
    pub filter: Option<String>,

    /// Document seeding the destination
    pub base: Option<PathBuf>,

    /// Output destination
    pub output: OutputTarget,

    /// Merge and report without writing the document
    pub dry_run: bool,
}

impl MergeOptions {
    /// Create options for the given inputs with default settings
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate options and compile the key filter
    pub fn validate(&self) -> Result<Option<KeyFilter>, ConfigError> {
        if self.inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        Ok(KeyFilter::compile(self.filter.as_deref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        let set = ExtensionSet::parse::<&str>(&[]).unwrap();
        assert_eq!(set, ExtensionSet::default());
        assert!(set.accepts(Path::new("a.yaml")));
        assert!(set.accepts(Path::new("dir/b.yml")));
        assert!(!set.accepts(Path::new("c.json")));
        assert!(!set.accepts(Path::new("noext")));
    }

    #[test]
    fn test_any_disables_filtering() {
        let set = ExtensionSet::parse(&["json", "any"]).unwrap();
        assert_eq!(set, ExtensionSet::Any);
        assert!(set.accepts(Path::new("noext")));
        assert!(set.accepts(Path::new("x.txt")));
    }

    #[test]
    fn test_leading_dot_stripped() {
        let set = ExtensionSet::parse(&[".conf"]).unwrap();
        assert!(set.accepts(Path::new("app.conf")));
        assert!(!set.accepts(Path::new("app.yaml")));
    }

    #[test]
    fn test_extension_case_sensitive() {
        let set = ExtensionSet::parse(&["yaml"]).unwrap();
        assert!(!set.accepts(Path::new("A.YAML")));
    }

    #[test]
    fn test_invalid_extension() {
        let err = ExtensionSet::parse(&["."]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtension(_)));
    }

    #[test]
    fn test_extension_display() {
        assert_eq!(ExtensionSet::default().to_string(), "[yaml, yml]");
        assert_eq!(ExtensionSet::Any.to_string(), "any");
    }

    #[test]
    fn test_output_target() {
        assert_eq!(OutputTarget::parse("-"), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::parse("out.yaml"),
            OutputTarget::File(PathBuf::from("out.yaml"))
        );
    }

    #[test]
    fn test_validate_requires_inputs() {
        let err = MergeOptions::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::NoInputs));
    }

    #[test]
    fn test_validate_compiles_filter() {
        let options = MergeOptions::new(vec![PathBuf::from("a.yaml")]);
        assert!(options.validate().unwrap().is_none());

        let options = options.with_filter("^keep_");
        let filter = options.validate().unwrap().unwrap();
        assert!(filter.keep("keep_x"));
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let options = MergeOptions::new(vec![PathBuf::from("a.yaml")]).with_filter("[");
        let err = options.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFilter(_)));
    }
}
