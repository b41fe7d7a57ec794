//! `clubdues` command-line front end.
//!
//! # Responsibility
//! - Resolve settings from flags, environment and `.env`.
//! - Open the ledger database and run exactly one command against it.

mod cli;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use clubdues_core::db::open_db;
use config::Settings;
use log::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    settings.init_logging()?;

    let conn = open_db(&settings.db_path)
        .with_context(|| format!("failed to open database {}", settings.db_path.display()))?;
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        clubdues_core::core_version()
    );

    commands::run(&conn, &settings, cli.command)
}
