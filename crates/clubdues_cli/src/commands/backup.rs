use crate::config::Settings;
use anyhow::{Context, Result};
use clubdues_core::db::{backup_database, Connection};

pub fn cmd_backup(conn: &Connection, settings: &Settings) -> Result<()> {
    let path = backup_database(conn, &settings.backup_dir).with_context(|| {
        format!(
            "failed to back up database into {}",
            settings.backup_dir.display()
        )
    })?;
    println!("Backup written to {}", path.display());
    Ok(())
}
