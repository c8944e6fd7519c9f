//! Built-in defaults (layer 1)

/// Extensions accepted when `--extension` is not given
pub const DEFAULT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension value that disables extension filtering
pub const ANY_EXTENSION: &str = "any";

/// Output value meaning standard output
pub const STDOUT_MARKER: &str = "-";
