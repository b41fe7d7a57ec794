mod backup;
mod group;
mod member;
mod payment;
mod report;

use crate::cli::Command;
use crate::config::Settings;
use anyhow::Result;
use clubdues_core::db::Connection;

/// Dispatches one parsed command against an open ledger database.
pub fn run(conn: &Connection, settings: &Settings, command: Command) -> Result<()> {
    match command {
        Command::Group { group_cmd } => group::run(conn, settings, group_cmd),
        Command::Member { member_cmd } => member::run(conn, settings, member_cmd),
        Command::Pay {
            period,
            member,
            group,
            name,
        } => payment::cmd_pay(conn, period, member, group, name),
        Command::Unpaid { period, group } => payment::cmd_unpaid(conn, settings, period, group),
        Command::Report { report_cmd } => report::run(conn, settings, report_cmd),
        Command::Backup => backup::cmd_backup(conn, settings),
    }
}
