//! Point-in-time database snapshots.

use super::{DbError, DbResult};
use chrono::Local;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = "db";

/// Writes a consistent copy of the `main` database into `backup_dir`.
///
/// The snapshot is named `backup_<YYYYMMDD_HHMMSS>.db`; a numeric suffix is
/// appended when a snapshot with the same timestamp already exists.
/// Returns the path of the written file.
pub fn backup_database(conn: &Connection, backup_dir: impl AsRef<Path>) -> DbResult<PathBuf> {
    let backup_dir = backup_dir.as_ref();
    std::fs::create_dir_all(backup_dir).map_err(|source| DbError::Backup {
        path: backup_dir.display().to_string(),
        source,
    })?;

    let target = next_backup_path(backup_dir, &Local::now().format("%Y%m%d_%H%M%S").to_string());
    let target_text = target.to_string_lossy().into_owned();

    match conn.execute("VACUUM INTO ?1;", [target_text.as_str()]) {
        Ok(_) => {
            info!("event=db_backup module=db status=ok path={target_text}");
            Ok(target)
        }
        Err(err) => {
            error!("event=db_backup module=db status=error path={target_text} error={err}");
            Err(err.into())
        }
    }
}

fn next_backup_path(dir: &Path, stamp: &str) -> PathBuf {
    let first = dir.join(format!("{BACKUP_PREFIX}{stamp}.{BACKUP_EXTENSION}"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{BACKUP_PREFIX}{stamp}_{n}.{BACKUP_EXTENSION}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}
