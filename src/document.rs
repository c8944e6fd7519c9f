//! YAML documents: loading, conversion to [`Node`] trees, and rendering
//!
//! A file may hold a stream of `---` separated documents; each one must be a
//! mapping at the top level. Empty documents contribute nothing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use sha2::{Digest, Sha256};
use yaml_merge_engine::{Mapping, Node, Scalar};

/// Errors for document loading and rendering
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: top-level document must be a mapping, found {found}", path.display())]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("{}: unsupported {kind} used as a mapping key", path.display())]
    UnsupportedKey { path: PathBuf, kind: &'static str },

    #[error("{}: duplicate mapping key '{key}'", path.display())]
    DuplicateKey { path: PathBuf, key: String },

    #[error("failed to serialize merged document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// A file read from disk and parsed into top-level mappings
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,

    /// Top-level mappings in stream order
    pub documents: Vec<Mapping>,
}

impl LoadedDocument {
    /// Read and parse a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let text = String::from_utf8(bytes).map_err(|source| DocumentError::Utf8 {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            digest,
            documents: parse_documents(&text, path)?,
        })
    }

    /// Whether the file contributed no data at all
    pub fn is_empty(&self) -> bool {
        self.documents.iter().all(Mapping::is_empty)
    }
}

/// Parse a YAML stream into its top-level mappings.
///
/// `path` only labels errors.
pub fn parse_documents(text: &str, path: &Path) -> Result<Vec<Mapping>, DocumentError> {
    let mut documents = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match to_node(value, path)? {
            Node::Mapping(map) => documents.push(map),
            node if node.is_null() => {}
            other => {
                return Err(DocumentError::NotAMapping {
                    path: path.to_path_buf(),
                    found: other.kind(),
                })
            }
        }
    }

    Ok(documents)
}

/// Render a merged mapping as block-style YAML
pub fn render(root: &Mapping) -> Result<String, DocumentError> {
    Ok(serde_yaml::to_string(&mapping_to_value(root))?)
}

/// Convert a YAML value to a tree node
fn to_node(value: Value, path: &Path) -> Result<Node, DocumentError> {
    let node = match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Node::Scalar(Scalar::Number(n)),
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(|item| to_node(item, path))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut converted = Mapping::new();
            for (key, value) in map {
                let key = key_text(key, path)?;
                if converted.contains_key(&key) {
                    return Err(DocumentError::DuplicateKey {
                        path: path.to_path_buf(),
                        key,
                    });
                }
                converted.insert(key, to_node(value, path)?);
            }
            Node::Mapping(converted)
        }
        // Tags carry no meaning for merging
        Value::Tagged(tagged) => to_node(tagged.value, path)?,
    };
    Ok(node)
}

/// Mapping keys are strings; other scalars use their textual form
fn key_text(key: Value, path: &Path) -> Result<String, DocumentError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(Scalar::Null.to_string()),
        Value::Tagged(tagged) => key_text(tagged.value, path),
        Value::Sequence(_) => Err(DocumentError::UnsupportedKey {
            path: path.to_path_buf(),
            kind: "sequence",
        }),
        Value::Mapping(_) => Err(DocumentError::UnsupportedKey {
            path: path.to_path_buf(),
            kind: "mapping",
        }),
    }
}

fn mapping_to_value(map: &Mapping) -> Value {
    let mut converted = serde_yaml::Mapping::new();
    for (key, node) in map {
        converted.insert(Value::String(key.clone()), to_value(node));
    }
    Value::Mapping(converted)
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Mapping(map) => mapping_to_value(map),
        Node::Sequence(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Node::Scalar(Scalar::Null) => Value::Null,
        Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        Node::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
        Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Result<Vec<Mapping>, DocumentError> {
        parse_documents(text, Path::new("test.yaml"))
    }

    #[test]
    fn test_parse_nested() {
        let docs = parse("db:\n  host: h1\n  ports: [1, 2]\n").unwrap();
        assert_eq!(docs.len(), 1);

        let root = Node::Mapping(docs[0].clone());
        assert_eq!(root.get_path("db.host").and_then(Node::as_str), Some("h1"));
        let ports = root.get_path("db.ports").and_then(Node::as_sequence).unwrap();
        assert_eq!(ports, &[Node::from(1), Node::from(2)]);
    }

    #[test]
    fn test_parse_scalar_kinds() {
        let docs = parse("s: text\ni: 3\nf: 1.5\nb: true\nn: ~\n").unwrap();
        let doc = &docs[0];
        assert_eq!(doc["s"], Node::from("text"));
        assert_eq!(doc["i"], Node::from(3));
        assert_eq!(doc["f"], Node::from(1.5));
        assert_eq!(doc["b"], Node::from(true));
        assert!(doc["n"].is_null());
    }

    #[test]
    fn test_parse_multi_document_stream() {
        let docs = parse("a: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["a"], Node::from(1));
        assert_eq!(docs[1]["b"], Node::from(2));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_non_string_keys() {
        let docs = parse("1: one\ntrue: yes\n").unwrap();
        assert_eq!(docs[0]["1"], Node::from("one"));
        assert_eq!(docs[0]["true"], Node::from("yes"));
    }

    #[test]
    fn test_colliding_keys_rejected() {
        let err = parse("1: int\n'1': str\n").unwrap_err();
        assert!(matches!(&err, DocumentError::DuplicateKey { key, .. } if key == "1"));
        assert!(err.to_string().contains("test.yaml"));

        let err = parse("nested:\n  true: a\n  'true': b\n").unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateKey { .. }));
    }

    #[test]
    fn test_tags_stripped() {
        let docs = parse("a: !custom value\n").unwrap();
        assert_eq!(docs[0]["a"], Node::from("value"));
    }

    #[test]
    fn test_sequence_top_level_rejected() {
        let err = parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping { found: "sequence", .. }));
        assert!(err.to_string().contains("test.yaml"));
    }

    #[test]
    fn test_scalar_top_level_rejected() {
        let err = parse("just text\n").unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping { found: "scalar", .. }));
    }

    #[test]
    fn test_syntax_error_names_path() {
        let err = parse("a: [1, 2\n").unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
        assert!(err.to_string().contains("test.yaml"));
    }

    #[test]
    fn test_render_sorted_block_style() {
        let docs = parse("b:\n  y: 2\n  x: [1]\na: 1\n").unwrap();
        let text = render(&docs[0]).unwrap();
        assert_eq!(text, "a: 1\nb:\n  x:\n  - 1\n  y: 2\n");
    }

    #[test]
    fn test_render_then_parse_preserves_tree() {
        let docs = parse("k:\n  - {a: 1}\n  - null\n  - 2.5\n").unwrap();
        let text = render(&docs[0]).unwrap();
        assert_eq!(parse(&text).unwrap(), docs);
    }

    #[test]
    fn test_load_computes_digest() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "a: 1").unwrap();

        let loaded = LoadedDocument::load(temp.path()).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.digest.len(), 64);
        assert!(!loaded.is_empty());
    }

    #[test]
    fn test_load_invalid_utf8() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0xff, 0xfe]).unwrap();

        let err = LoadedDocument::load(temp.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Utf8 { .. }));
        assert!(err.to_string().contains(&temp.path().display().to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LoadedDocument::load(Path::new("/nonexistent/file.yaml")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
