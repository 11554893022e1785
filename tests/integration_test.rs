//! Integration tests that verify a real YAML export matches SQLite after import.
//!
//! These tests:
//! 1. Import the export once into a shared temporary database
//! 2. Sample random solar system documents from the export
//! 3. Compare them with the stored rows, and check links and foreign keys
//!
//! Run with:
//! ```sh
//! EVE_SDE_YAML_DIR=/path/to/sde cargo test --test integration_test -- --ignored
//! ```

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rusqlite::Connection;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

use eve_universe_to_sqlite::schema::ALL_TABLES;
use eve_universe_to_sqlite::{convert_to_sqlite, ImportOptions, ImportSummary, SilentUi};

// =============================================================================
// Test Configuration
// =============================================================================

/// Number of random samples per check
const SAMPLE_SIZE: usize = 25;

/// Random seed for reproducible sampling
const RANDOM_SEED: u64 = 42;

/// Get the export root from the environment.
/// Set EVE_SDE_YAML_DIR to the directory containing universe/ and bsd/.
fn get_sde_dir() -> PathBuf {
    std::env::var("EVE_SDE_YAML_DIR")
        .map(PathBuf::from)
        .expect("EVE_SDE_YAML_DIR environment variable must be set to the SDE directory path")
}

// =============================================================================
// Shared Test Database
// =============================================================================

/// Shared test database - created once and reused for all tests
static TEST_DB: Lazy<Mutex<TestDatabase>> = Lazy::new(|| Mutex::new(TestDatabase::new()));

struct TestDatabase {
    _temp_file: NamedTempFile,
    db_path: PathBuf,
    sde_dir: PathBuf,
    summary: ImportSummary,
}

impl TestDatabase {
    fn new() -> Self {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let sde_dir = get_sde_dir();

        let summary = convert_to_sqlite(
            &sde_dir,
            &db_path,
            &ImportOptions { fresh: true },
            &mut SilentUi::new(),
        )
        .expect("Failed to import SDE into SQLite");

        Self {
            _temp_file: temp_file,
            db_path,
            sde_dir,
            summary,
        }
    }
}

fn get_test_db() -> Connection {
    let db = TEST_DB.lock().unwrap();
    Connection::open(&db.db_path).expect("Failed to open test database")
}

fn get_sde_root() -> PathBuf {
    TEST_DB.lock().unwrap().sde_dir.clone()
}

// =============================================================================
// Sampling Utilities
// =============================================================================

/// Every solarsystem.yaml below the universe directory
fn find_system_documents(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            find_system_documents(&path, found);
        } else if path.file_name().and_then(|n| n.to_str()) == Some("solarsystem.yaml") {
            found.push(path);
        }
    }
}

fn sample<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(RANDOM_SEED);
    items
        .choose_multiple(&mut rng, count.min(items.len()))
        .cloned()
        .collect()
}

fn load_yaml(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_yaml::from_str(&content).ok()
}

// =============================================================================
// Tests
// =============================================================================

#[test]
#[ignore]
fn test_sampled_systems_match_documents() {
    let db = get_test_db();
    let mut documents = Vec::new();
    find_system_documents(&get_sde_root().join("universe"), &mut documents);
    documents.sort();
    assert!(!documents.is_empty(), "no solarsystem.yaml files found");

    for path in sample(&documents, SAMPLE_SIZE) {
        let Some(doc) = load_yaml(&path) else {
            continue;
        };
        let (Some(system_id), Some(security)) = (
            doc.get("solarSystemID").and_then(Value::as_i64),
            doc.get("security").and_then(Value::as_f64),
        ) else {
            continue;
        };

        let (stored_security, planet_count, gate_count): (f64, i64, i64) = db
            .query_row(
                "SELECT security_status,
                        (SELECT COUNT(*) FROM planets WHERE system_id = ?1),
                        (SELECT COUNT(*) FROM stargates WHERE system_id = ?1)
                 FROM systems WHERE system_id = ?1",
                [system_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap_or_else(|_| panic!("system {} from {:?} not stored", system_id, path));

        assert!(
            (stored_security - security).abs() < 1e-9,
            "security mismatch for {}",
            system_id
        );

        let expected_planets = doc
            .get("planets")
            .and_then(Value::as_mapping)
            .map_or(0, |m| m.len()) as i64;
        assert_eq!(planet_count, expected_planets, "planets of {}", system_id);

        // Stored stargates are the resolved subset of the document's
        let document_gates = doc
            .get("stargates")
            .and_then(Value::as_mapping)
            .map_or(0, |m| m.len()) as i64;
        assert!(gate_count <= document_gates, "stargates of {}", system_id);
    }
}

#[test]
#[ignore]
fn test_sampled_stargates_link_back() {
    let db = get_test_db();
    let gates: Vec<(i64, i64, i64)> = db
        .prepare("SELECT stargate_id, destination_stargate_id, destination_system_id FROM stargates ORDER BY stargate_id")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(!gates.is_empty(), "no stargates imported");

    for (stargate_id, destination, destination_system) in sample(&gates, SAMPLE_SIZE) {
        // The destination gate was observed, so it is stored unless its own
        // destination lies outside the export
        let owner: Option<i64> = db
            .query_row(
                "SELECT system_id FROM stargates WHERE stargate_id = ?1",
                [destination],
                |row| row.get(0),
            )
            .ok();
        if let Some(owner) = owner {
            assert_eq!(owner, destination_system, "stargate {}", stargate_id);
        }
    }
}

#[test]
#[ignore]
fn test_no_orphan_rows() {
    let db = get_test_db();

    for table in ALL_TABLES {
        for fk in table.foreign_keys {
            let sql = format!(
                "SELECT COUNT(*) FROM {t} c LEFT JOIN {p} p ON c.{col} = p.{pcol} WHERE p.{pcol} IS NULL",
                t = table.name,
                p = fk.references_table,
                col = fk.column,
                pcol = fk.references_column
            );
            let orphans: i64 = db.query_row(&sql, [], |row| row.get(0)).unwrap();
            assert_eq!(orphans, 0, "orphans in {}.{}", table.name, fk.column);
        }
    }
}

#[test]
#[ignore]
fn test_region_names_are_spaced() {
    let db = get_test_db();
    let names: Vec<String> = db
        .prepare("SELECT region_name FROM regions")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    for name in &names {
        let chars: Vec<char> = name.chars().collect();
        assert!(
            !chars
                .windows(2)
                .any(|w| w[0].is_ascii_lowercase() && w[1].is_ascii_uppercase()),
            "unspaced region name {:?}",
            name
        );
    }

    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
#[ignore]
fn test_summary_matches_tables() {
    let db = get_test_db();
    let summary = TEST_DB.lock().unwrap().summary.clone();

    for load in &summary.load.tables {
        let count: i64 = db
            .query_row(&format!("SELECT COUNT(*) FROM {}", load.table), [], |row| {
                row.get(0)
            })
            .unwrap();
        // Fresh database: every offered row is new unless ids repeat in the export
        assert_eq!(count as usize, load.written, "table {}", load.table);
        assert!(load.written <= load.offered);
    }
}
