use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::row::TableRow;
use super::schema_gen::{generate_create_table, generate_indexes, generate_upsert};
use crate::schema::ALL_TABLES;
use crate::transform::{build_universe, SdeLayout, UniverseBatch};
use crate::ui::{Phase, Ui};

/// Rows between progress updates
const BATCH_SIZE: usize = 1000;

/// Outcome of upserting one table
#[derive(Debug, Clone, Serialize)]
pub struct TableLoad {
    pub table: &'static str,
    /// Rows handed to the store
    pub offered: usize,
    /// Rows inserted or updated; rows skipped by `DO NOTHING` are not counted
    pub written: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub tables: Vec<TableLoad>,
}

impl LoadSummary {
    pub fn get(&self, table: &str) -> Option<&TableLoad> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn total_written(&self) -> usize {
        self.tables.iter().map(|t| t.written).sum()
    }
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) a database, keeping any rows already stored
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;
        Self::configure(conn)
    }

    /// Create a database from scratch, removing an existing file first
    pub fn create(db_path: &Path) -> Result<Self> {
        for path in sqlite_files(db_path) {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove existing database: {:?}", path))?;
            }
        }
        Self::open(db_path)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create database")?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Foreign keys are enforced so a broken batch fails loudly and rolls back
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create all tables and foreign-key indexes that do not exist yet
    pub fn create_tables(&self) -> Result<()> {
        for schema in ALL_TABLES {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Upsert every batch of a run in one transaction.
    ///
    /// Tables are written parents first. Any failure returns before `commit`,
    /// and dropping the transaction rolls back the whole run.
    pub fn load(&mut self, batch: &UniverseBatch, ui: &mut impl Ui) -> Result<LoadSummary> {
        let tx = self.conn.transaction()?;

        let tables = vec![
            upsert_rows(&tx, &batch.regions, ui)?,
            upsert_rows(&tx, &batch.constellations, ui)?,
            upsert_rows(&tx, &batch.systems, ui)?,
            upsert_rows(&tx, &batch.planets, ui)?,
            upsert_rows(&tx, &batch.stargates, ui)?,
            upsert_rows(&tx, &batch.stations, ui)?,
        ];

        tx.commit().context("Failed to commit import")?;
        ui.clear_progress();

        Ok(LoadSummary { tables })
    }

    /// Finalize the database after a load
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

/// The database file and its WAL side files
fn sqlite_files(db_path: &Path) -> Vec<PathBuf> {
    let mut files = vec![db_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

fn upsert_rows<R: TableRow>(tx: &Transaction, rows: &[R], ui: &mut impl Ui) -> Result<TableLoad> {
    let schema = R::schema();
    let sql = generate_upsert(schema);
    let mut stmt = tx
        .prepare_cached(&sql)
        .with_context(|| format!("Failed to prepare upsert for: {}", schema.name))?;

    let total = rows.len() as u64;
    let mut written = 0;

    for (i, row) in rows.iter().enumerate() {
        for (idx, value) in row.values().iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        written += stmt
            .raw_execute()
            .with_context(|| format!("Failed to insert into {}", schema.name))?;

        if (i + 1) % BATCH_SIZE == 0 {
            ui.set_progress((i + 1) as u64, total, schema.name);
        }
    }

    ui.set_progress(total, total, schema.name);
    ui.tally(schema.name, written as u64);

    Ok(TableLoad {
        table: schema.name,
        offered: rows.len(),
        written,
    })
}

/// Write a finished batch to `output_db`.
///
/// Upserts into the existing database, or with `fresh` builds a new one beside
/// it and swaps it in after the load committed. A failed fresh load leaves the
/// previous database untouched.
pub fn write_universe(
    output_db: &Path,
    batch: &UniverseBatch,
    options: &ImportOptions,
    ui: &mut impl Ui,
) -> Result<LoadSummary> {
    if !options.fresh {
        let mut writer = SqliteWriter::open(output_db)?;
        writer.create_tables()?;
        let load = writer.load(batch, ui)?;
        writer.finalize()?;
        return Ok(load);
    }

    let staging = staging_path(output_db);
    let built = SqliteWriter::create(&staging).and_then(|mut writer| {
        writer.create_tables()?;
        let load = writer.load(batch, ui)?;
        writer.finalize()?;
        Ok(load)
    });

    match built {
        Ok(load) => {
            replace_database(&staging, output_db)?;
            Ok(load)
        }
        Err(e) => {
            for path in sqlite_files(&staging) {
                let _ = std::fs::remove_file(path);
            }
            Err(e)
        }
    }
}

/// Sibling file a fresh import is built in
fn staging_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(".importing");
    PathBuf::from(name)
}

/// Move a closed staging database over `db_path`, dropping the old side files
fn replace_database(staging: &Path, db_path: &Path) -> Result<()> {
    for path in sqlite_files(db_path).into_iter().skip(1) {
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale database file: {:?}", path))?;
        }
    }
    std::fs::rename(staging, db_path)
        .with_context(|| format!("Failed to move {:?} to {:?}", staging, db_path))?;
    for path in sqlite_files(staging).into_iter().skip(1) {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

/// Options for [`convert_to_sqlite`]
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Replace the database instead of upserting into it
    pub fresh: bool,
}

/// What a full run produced, for the final report
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub sde_dir: PathBuf,
    pub output_db: PathBuf,
    pub load: LoadSummary,
    pub rejected: Vec<String>,
    pub unresolved_stargates: usize,
    pub orphan_stations: usize,
}

/// Transform an extracted YAML export and load it into SQLite
pub fn convert_to_sqlite(
    sde_dir: &Path,
    output_db: &Path,
    options: &ImportOptions,
    ui: &mut impl Ui,
) -> Result<ImportSummary> {
    let layout = SdeLayout::new(sde_dir);
    let batch = build_universe(&layout, ui)?;

    ui.set_phase(Phase::Writing);
    ui.set_info(format!("{:?}", output_db));

    let load = write_universe(output_db, &batch, options, ui)?;

    Ok(ImportSummary {
        sde_dir: sde_dir.to_path_buf(),
        output_db: output_db.to_path_buf(),
        load,
        rejected: batch.rejected.iter().map(ToString::to_string).collect(),
        unresolved_stargates: batch.unresolved_stargates,
        orphan_stations: batch.orphan_stations,
    })
}
