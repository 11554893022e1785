use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

use crate::parser::{get_id, get_text, read_table};
use crate::ui::Ui;

/// Flat item id -> display name lookup, loaded once from `invNames.yaml`
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    names: HashMap<i64, String>,
    skipped: usize,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from a sequence of `{itemID, itemName}` records.
    /// Later duplicates overwrite earlier ones.
    pub fn load(path: &Path) -> Result<Self> {
        let records = read_table(path)?;
        let mut table = Self::new();

        for record in &records {
            match (get_id(record, "itemID"), get_text(record, "itemName")) {
                (Some(id), Some(name)) => table.insert(id, name),
                _ => table.skipped += 1,
            }
        }

        Ok(table)
    }

    /// Load the table, degrading to an empty one if the file is unusable.
    /// The failure is reported through the UI and the run carries on with
    /// fallback names.
    pub fn load_or_empty(path: &Path, ui: &mut impl Ui) -> Self {
        match Self::load(path) {
            Ok(table) => {
                ui.log(format!("Loaded {} names", table.len()));
                if table.skipped > 0 {
                    ui.log(format!(
                        "Skipped {} name records without itemID/itemName",
                        table.skipped
                    ));
                }
                table
            }
            Err(e) => {
                ui.log(format!("Name table unavailable, using fallback names: {:#}", e));
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Table entry for `id`, else `fallback`
    pub fn resolve(&self, id: i64, fallback: &str) -> String {
        resolve_display_name(self.get(id), None, || fallback.to_string())
    }

    /// Three-tier display name for an entity: table entry, then the name the
    /// export provided (folder name etc.), then a synthesized placeholder.
    pub fn display_name(
        &self,
        id: i64,
        provided: Option<&str>,
        placeholder: impl FnOnce() -> String,
    ) -> String {
        resolve_display_name(self.get(id), provided, placeholder)
    }

    /// Record count that lacked an id or a name when loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Display-name precedence, in one place: table entry, provided name,
/// placeholder. Blank strings count as absent at every tier.
pub fn resolve_display_name(
    table_entry: Option<&str>,
    provided: Option<&str>,
    placeholder: impl FnOnce() -> String,
) -> String {
    if let Some(name) = table_entry.filter(|s| !s.trim().is_empty()) {
        return name.to_string();
    }
    if let Some(name) = provided.filter(|s| !s.trim().is_empty()) {
        return name.to_string();
    }
    placeholder()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentUi;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_keeps_last_duplicate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invNames.yaml");
        fs::write(
            &path,
            "- itemID: 30000142\n  itemName: Old Jita\n\
             - itemID: 11\n  itemName: Planet (Temperate)\n\
             - itemID: 30000142\n  itemName: Jita\n\
             - itemID: 12\n\
             - itemName: orphan\n\
             - itemID: 13\n  itemName: 404\n",
        )
        .unwrap();

        let table = NameTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(30000142), Some("Jita"));
        assert_eq!(table.get(13), Some("404"));
        assert_eq!(table.skipped(), 2);
    }

    #[test]
    fn test_load_or_empty_degrades() {
        let dir = TempDir::new().unwrap();
        let mut ui = SilentUi::new();

        let missing = NameTable::load_or_empty(&dir.path().join("nope.yaml"), &mut ui);
        assert!(missing.is_empty());

        let path = dir.path().join("invNames.yaml");
        fs::write(&path, "- itemID: [\n").unwrap();
        let malformed = NameTable::load_or_empty(&path, &mut ui);
        assert!(malformed.is_empty());
    }

    #[test]
    fn test_resolve_uses_fallback() {
        let mut table = NameTable::new();
        table.insert(1, "Amarr");
        table.insert(3, "");
        assert_eq!(table.resolve(1, "x"), "Amarr");
        assert_eq!(table.resolve(2, "x"), "x");
        assert_eq!(table.resolve(3, "x"), "x");
    }

    #[test]
    fn test_blank_entry_falls_through() {
        let mut table = NameTable::new();
        table.insert(30002187, "  ");
        assert_eq!(
            table.display_name(30002187, Some("Amarr"), || "System 30002187".into()),
            "Amarr"
        );
    }

    #[test]
    fn test_display_name_precedence() {
        let mut table = NameTable::new();
        table.insert(40000001, "Jita I");

        assert_eq!(
            table.display_name(40000001, Some("folder"), || "Planet 40000001".into()),
            "Jita I"
        );
        assert_eq!(
            table.display_name(40000002, Some("folder"), || "Planet 40000002".into()),
            "folder"
        );
        assert_eq!(
            table.display_name(40000002, None, || "Planet 40000002".into()),
            "Planet 40000002"
        );
        assert_eq!(
            resolve_display_name(Some(" "), Some(""), || "placeholder".into()),
            "placeholder"
        );
    }
}
