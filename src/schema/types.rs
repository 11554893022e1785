use std::collections::HashSet;

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// Foreign key reference to another table's primary key
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// What an insert does when the primary key already exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConflictPolicy {
    /// Keep the stored row (`ON CONFLICT DO NOTHING`)
    Ignore,
    /// Overwrite every non-key column (`ON CONFLICT DO UPDATE SET ...`)
    UpdateAll,
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static str,
    pub foreign_keys: &'static [ForeignKey],
    pub on_conflict: ConflictPolicy,
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .filter(|t| *t != self.name)
            .collect()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Human-readable column listing, as printed by `list-tables <table>`
    pub fn describe(&self) -> String {
        let mut lines = vec![format!("{} (conflict: {:?})", self.name, self.on_conflict)];

        for column in self.columns {
            let mut line = format!("  {:<24} {}", column.name, column.col_type.sql());
            if column.name == self.primary_key {
                line.push_str(" PRIMARY KEY");
            } else if !column.nullable {
                line.push_str(" NOT NULL");
            }
            if let Some(fk) = self.foreign_keys.iter().find(|fk| fk.column == column.name) {
                line.push_str(&format!(
                    " -> {}.{}",
                    fk.references_table, fk.references_column
                ));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    /// Columns an upsert may overwrite
    pub fn non_key_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns
            .iter()
            .map(|c| c.name)
            .filter(move |name| *name != self.primary_key)
    }
}
