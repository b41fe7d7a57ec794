//! Runtime settings resolved from flags, environment and `.env`.

use crate::cli::Cli;
use anyhow::{Context, Result};
use clubdues_core::{default_log_level, init_logging};
use std::path::{Path, PathBuf};

const DEFAULT_BACKUP_DIR: &str = "backups";

pub struct Settings {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub backup_dir: PathBuf,
    pub json: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let log_dir = cli.log_dir.as_deref().map(absolutize).transpose()?;
        let backup_dir = match &cli.backup_dir {
            Some(dir) => dir.clone(),
            None => cli
                .db
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_BACKUP_DIR),
        };

        Ok(Self {
            db_path: cli.db.clone(),
            log_dir,
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            backup_dir,
            json: cli.json,
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<()> {
        if let Some(dir) = &self.log_dir {
            init_logging(&self.log_level, dir)
                .with_context(|| format!("failed to start logging in {}", dir.display()))?;
        }
        Ok(())
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
