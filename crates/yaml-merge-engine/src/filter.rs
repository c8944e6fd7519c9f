//! Key filter compiled from a regular expression.

use regex_lite::Regex;

/// Errors for key filter compilation
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },
}

/// Predicate over mapping keys.
///
/// A key is kept when the pattern matches anywhere in it (search, not
/// full-match). The empty pattern keeps every key.
#[derive(Debug, Clone)]
pub struct KeyFilter {
    regex: Regex,
}

impl KeyFilter {
    /// Compile a filter from a pattern
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Compile an optional pattern; `None` means no filtering at all
    pub fn compile(pattern: Option<&str>) -> Result<Option<Self>, FilterError> {
        pattern.map(Self::new).transpose()
    }

    /// Whether the subtree under `key` takes part in the merge
    pub fn keep(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// Source text of the compiled pattern
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}
