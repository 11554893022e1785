use std::path::PathBuf;
use thiserror::Error;

/// A data fault that rejects a single node of the export tree.
///
/// These never abort a run: the walker records them, skips the node (and its
/// subtree), and carries on with the node's siblings.
#[derive(Error, Debug)]
pub enum NodeError {
    /// The document exists but is not valid YAML.
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// The document could not be read from disk.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A field the relational schema cannot do without is absent.
    #[error("{path:?}: missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },
    /// A field is present but has the wrong shape.
    #[error("{path:?}: invalid field '{field}' ({detail})")]
    InvalidField {
        path: PathBuf,
        field: String,
        detail: String,
    },
}
