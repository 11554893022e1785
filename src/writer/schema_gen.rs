use crate::schema::{ConflictPolicy, TableSchema};

/// Generate CREATE TABLE SQL for a table schema.
///
/// Uses `IF NOT EXISTS` so repeated imports into the same database keep
/// existing rows and only upsert over them.
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let pk = if col.name == schema.primary_key {
            " PRIMARY KEY"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql(),
            pk,
            null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

/// Generate the single-row upsert for a table, honoring its conflict policy
pub fn generate_upsert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

    let action = match schema.on_conflict {
        ConflictPolicy::Ignore => "DO NOTHING".to_string(),
        ConflictPolicy::UpdateAll => {
            let assignments: Vec<String> = schema
                .non_key_columns()
                .map(|c| format!("{} = excluded.{}", c, c))
                .collect();
            format!("DO UPDATE SET {}", assignments.join(", "))
        }
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        schema.name,
        columns.join(", "),
        placeholders.join(", "),
        schema.primary_key,
        action
    )
}
