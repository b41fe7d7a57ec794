//! SQLite storage bootstrap, schema migrations and snapshots.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the club ledger.
//! - Apply schema migrations in deterministic order.
//! - Write point-in-time copies of the database for backup tooling.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write ledger data before migrations succeed.

mod backup;
pub mod migrations;
mod open;

pub use backup::backup_database;
pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening, migrating or snapshotting a database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("backup failed for `{path}`: {source}")]
    Backup {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
