use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

use super::error::NodeError;

/// Outcome of reading one structured document of the export tree
#[derive(Debug)]
pub enum Document {
    /// No file at this path
    Missing,
    /// File exists but holds no data (empty, whitespace, or `~`)
    Empty,
    Parsed(Value),
}

/// Read a YAML document, distinguishing a missing file from an empty one
pub fn read_document(path: &Path) -> Result<Document, NodeError> {
    if !path.is_file() {
        return Ok(Document::Missing);
    }

    let content = fs::read_to_string(path).map_err(|source| NodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Document::Empty);
    }

    let value: Value = serde_yaml::from_str(&content).map_err(|source| NodeError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Null => Ok(Document::Empty),
        v => Ok(Document::Parsed(v)),
    }
}

/// Read a flat top-level table (a YAML sequence of records)
pub fn read_table(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read table: {:?}", path))?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML: {:?}", path))?;

    match value {
        Value::Sequence(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        _ => bail!("Expected a sequence of records in {:?}", path),
    }
}

/// Interpret a mapping key or scalar as an integer id.
///
/// The export keys child collections by numeric id, but some YAML emitters
/// quote them, so numeric strings are accepted too.
pub fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn get_id(doc: &Value, key: &str) -> Option<i64> {
    doc.get(key).and_then(as_id)
}

/// Read a scalar field as text, stringifying numbers and booleans
pub fn get_text(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(scalar_to_string)
}

pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Number of entries in a child collection, 0 when absent.
///
/// Collections are mappings keyed by id in the export, but sequences are
/// counted the same way.
pub fn collection_len(doc: &Value, key: &str) -> usize {
    match doc.get(key) {
        Some(Value::Mapping(m)) => m.len(),
        Some(Value::Sequence(s)) => s.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_read_document_states() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("region.yaml");
        assert!(matches!(read_document(&missing).unwrap(), Document::Missing));

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "  \n").unwrap();
        assert!(matches!(read_document(&empty).unwrap(), Document::Empty));

        let tilde = dir.path().join("tilde.yaml");
        fs::write(&tilde, "~\n").unwrap();
        assert!(matches!(read_document(&tilde).unwrap(), Document::Empty));

        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "regionID: [1, 2\n").unwrap();
        assert!(matches!(
            read_document(&broken),
            Err(NodeError::Parse { .. })
        ));

        let ok = dir.path().join("ok.yaml");
        fs::write(&ok, "regionID: 10000002\n").unwrap();
        match read_document(&ok).unwrap() {
            Document::Parsed(doc) => assert_eq!(get_id(&doc, "regionID"), Some(10000002)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_read_table_requires_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invNames.yaml");

        fs::write(&path, "- itemID: 1\n  itemName: A\n").unwrap();
        assert_eq!(read_table(&path).unwrap().len(), 1);

        fs::write(&path, "itemID: 1\n").unwrap();
        assert!(read_table(&path).is_err());

        assert!(read_table(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_as_id_accepts_quoted_keys() {
        assert_eq!(as_id(&yaml("50000056")), Some(50000056));
        assert_eq!(as_id(&yaml("'50000056'")), Some(50000056));
        assert_eq!(as_id(&yaml("abc")), None);
        assert_eq!(as_id(&yaml("1.5")), None);
    }

    #[test]
    fn test_collection_len() {
        let doc = yaml("moons:\n  1: {}\n  2: {}\nasteroidBelts: [a, b, c]\nother: 4\n");
        assert_eq!(collection_len(&doc, "moons"), 2);
        assert_eq!(collection_len(&doc, "asteroidBelts"), 3);
        assert_eq!(collection_len(&doc, "other"), 0);
        assert_eq!(collection_len(&doc, "absent"), 0);
    }

    #[test]
    fn test_get_text_stringifies_scalars() {
        let doc = yaml("a: Jita\nb: 42\nc: [1]\n");
        assert_eq!(get_text(&doc, "a").as_deref(), Some("Jita"));
        assert_eq!(get_text(&doc, "b").as_deref(), Some("42"));
        assert_eq!(get_text(&doc, "c"), None);
    }
}
