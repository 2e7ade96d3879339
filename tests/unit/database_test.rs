//! Unit tests for the workspace database layer (connection + migrations).

use crm_workspace::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use crm_workspace::database::Database;
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_store_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in ["schema_version", "kv_store"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail
    let result = run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");

    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, CURRENT_SCHEMA_VERSION as i64);
}

#[test]
fn test_kv_store_key_is_unique() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES ('tabs_1', '{}', 0)",
        [],
    )
    .unwrap();
    let dup = conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES ('tabs_1', '[]', 0)",
        [],
    );
    assert!(dup.is_err(), "kv_store.key must be a primary key");
}

#[test]
fn test_open_file_database_persists_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("workspace.db");

    {
        let db = Database::open(&db_path).expect("open failed");
        db.connection()
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES ('tabs_7', 'x', 1)",
                [],
            )
            .unwrap();
    }

    let db = Database::open(&db_path).expect("reopen failed");
    let value: String = db
        .connection()
        .query_row("SELECT value FROM kv_store WHERE key = 'tabs_7'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, "x");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}
