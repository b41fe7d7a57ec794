use clubdues_core::db::migrations::latest_version;
use clubdues_core::db::{backup_database, open_db, open_db_in_memory, DbError};
use clubdues_core::{
    ClubError, LedgerService, RepoError, RosterService, SqliteEntityStore, SqliteRosterRepository,
};
use clubdues_core::Period;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "groups");
    assert_table_exists(&conn, "members");
    assert_table_exists(&conn, "payments");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("club.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "payments");
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
fn payments_table_enforces_member_period_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO payments (payment_uuid, member_uuid, period) VALUES ('p1', 'm1', '2024-03');",
        [],
    )
    .unwrap();

    let err = conn
        .execute(
            "INSERT INTO payments (payment_uuid, member_uuid, period) VALUES ('p2', 'm1', '2024-03');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteRosterRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteRosterRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("groups"))));
}

#[test]
fn store_failures_surface_instead_of_empty_results() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteEntityStore::try_new(&conn).unwrap();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(store);
    let group_id = roster.create_group("Juniors", None).unwrap();

    conn.execute_batch("DROP TABLE payments;").unwrap();

    let err = ledger
        .unpaid_members(Period::parse("2024-03").unwrap(), group_id)
        .unwrap_err();
    assert!(matches!(err, ClubError::StoreUnavailable(_)));

    let err = ledger.monthly_counts(2024).unwrap_err();
    assert!(matches!(err, ClubError::StoreUnavailable(_)));
}

#[test]
fn backup_writes_a_readable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("club.db")).unwrap();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    roster.create_group("Juniors", None).unwrap();

    let backup_path = backup_database(&conn, dir.path().join("backups")).unwrap();
    assert!(backup_path.exists());
    let file_name = backup_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("backup_"));
    assert!(file_name.ends_with(".db"));

    let snapshot = open_db(&backup_path).unwrap();
    let restored = RosterService::new(SqliteRosterRepository::try_new(&snapshot).unwrap());
    let groups = restored.list_groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Juniors");
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
