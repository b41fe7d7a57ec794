//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the data access contracts the services depend on
//!   (`RosterRepository`, `LedgerRepository`, combined as `EntityStore`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`*NotFound`, `DuplicatePayment`)
//!   in addition to DB transport errors.
//! - Repositories refuse connections that are not migrated, so a missing or
//!   foreign database never reads back as empty data.

pub mod ledger_repo;
pub mod roster_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::group::GroupId;
use crate::model::member::MemberId;
use crate::model::period::Period;
use crate::model::ValidationError;
use ledger_repo::{LedgerRepository, SqliteLedgerRepository};
use roster_repo::{RosterRepository, SqliteRosterRepository};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by all repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),
    #[error("payment already recorded for member {member_id} in {period}")]
    DuplicatePayment { member_id: MemberId, period: Period },
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Transactional tabular store the services run against.
///
/// Implementations expose roster and ledger views over one underlying
/// store so that reports join consistent data.
pub trait EntityStore {
    type Roster: RosterRepository;
    type Ledger: LedgerRepository;

    fn roster(&self) -> &Self::Roster;
    fn ledger(&self) -> &Self::Ledger;

    /// Runs `read` so that every query inside it observes one snapshot.
    ///
    /// `read` must not write; the enclosing scope is committed only when
    /// `read` succeeds.
    fn read_consistent<T, E, F>(&self, read: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>;
}

/// SQLite-backed entity store borrowing one migrated connection.
#[derive(Clone, Copy)]
pub struct SqliteEntityStore<'conn> {
    conn: &'conn Connection,
    roster: SqliteRosterRepository<'conn>,
    ledger: SqliteLedgerRepository<'conn>,
}

impl<'conn> SqliteEntityStore<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            conn,
            roster: SqliteRosterRepository::try_new(conn)?,
            ledger: SqliteLedgerRepository::try_new(conn)?,
        })
    }
}

impl<'conn> EntityStore for SqliteEntityStore<'conn> {
    type Roster = SqliteRosterRepository<'conn>;
    type Ledger = SqliteLedgerRepository<'conn>;

    fn roster(&self) -> &Self::Roster {
        &self.roster
    }

    fn ledger(&self) -> &Self::Ledger {
        &self.ledger
    }

    fn read_consistent<T, E, F>(&self, read: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        // DEFERRED takes the shared lock on the first read and keeps it
        // until commit, so writers cannot land between the reads.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)
            .map_err(RepoError::from)?;
        let value = read(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_period(value: &str, column: &'static str) -> RepoResult<Period> {
    Period::parse(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid period `{value}` in {column}")))
}

pub(crate) fn exists(conn: &Connection, sql: &str, id: Uuid) -> RepoResult<bool> {
    let found: i64 = conn.query_row(sql, [id.to_string()], |row| row.get(0))?;
    Ok(found == 1)
}

pub(crate) fn group_exists(conn: &Connection, group_id: GroupId) -> RepoResult<bool> {
    exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM groups WHERE group_uuid = ?1);",
        group_id,
    )
}

pub(crate) fn member_exists(conn: &Connection, member_id: MemberId) -> RepoResult<bool> {
    exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM members WHERE member_uuid = ?1);",
        member_id,
    )
}
