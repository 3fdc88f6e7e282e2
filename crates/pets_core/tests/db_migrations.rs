use pets_core::contract::CONTENT_URI;
use pets_core::db::migrations::{latest_version, migrate};
use pets_core::db::{open, open_db, open_db_in_memory, DbConfig, DbError, DATABASE_NAME};
use pets_core::{FieldMap, ListQuery, PetGateway, RecordGateway};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_db_in_memory_creates_pets_table() {
    let session = open_db_in_memory().unwrap();

    assert_eq!(session.schema_version().unwrap(), latest_version());
    assert_table_exists(session.connection(), "pets");
    assert_eq!(
        columns_of(session.connection(), "pets"),
        vec!["id", "name", "breed", "gender", "weight"]
    );
}

#[test]
fn opening_same_database_twice_reuses_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::in_data_dir(dir.path());

    let first = open(&config).unwrap();
    let gateway = PetGateway::new(&first);
    let fields = FieldMap::new().with("name", "Rex").with("gender", 1_i64);
    gateway.insert(CONTENT_URI, &fields).unwrap().unwrap();
    drop(gateway);
    drop(first);

    assert!(dir.path().join(DATABASE_NAME).exists());

    let second = open(&config.with_busy_timeout(Duration::from_millis(250))).unwrap();
    assert_eq!(second.schema_version().unwrap(), latest_version());
    let rows = PetGateway::new(&second)
        .list(CONTENT_URI, &ListQuery::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
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

#[test]
fn opening_in_missing_directory_fails_without_retry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join(DATABASE_NAME);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn migrate_is_a_no_op() {
    let session = open_db_in_memory().unwrap();
    migrate(session.connection(), 1, 2).unwrap();

    assert_eq!(session.schema_version().unwrap(), latest_version());
    assert_eq!(
        columns_of(session.connection(), "pets"),
        vec!["id", "name", "breed", "gender", "weight"]
    );
}

fn columns_of(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
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
