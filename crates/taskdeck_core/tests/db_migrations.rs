use taskdeck_core::db::migrations::latest_version;
use taskdeck_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
}

#[test]
fn tasks_table_provides_storage_generated_defaults() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO tasks (uuid, title) VALUES (?1, ?2);",
        ["00000000-0000-4000-8000-000000000001", "defaults"],
    )
    .unwrap();

    let (status, created_at, updated_at): (String, i64, i64) = conn
        .query_row(
            "SELECT status, created_at, updated_at FROM tasks;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();

    assert_eq!(status, "pending");
    assert!(created_at > 0);
    assert_eq!(created_at, updated_at);
}

#[test]
fn tasks_table_rejects_invariant_violating_rows() {
    let conn = open_db_in_memory().unwrap();

    let blank_title = conn.execute(
        "INSERT INTO tasks (uuid, title) VALUES (?1, ?2);",
        ["00000000-0000-4000-8000-000000000002", "   "],
    );
    assert!(blank_title.is_err(), "blank title must violate the schema");

    let unknown_status = conn.execute(
        "INSERT INTO tasks (uuid, title, status) VALUES (?1, ?2, ?3);",
        ["00000000-0000-4000-8000-000000000003", "valid", "archived"],
    );
    assert!(
        unknown_status.is_err(),
        "status outside pending/completed must violate the schema"
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskdeck.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "tasks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
