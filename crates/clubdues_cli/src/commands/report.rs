use crate::cli::ReportCommand;
use crate::config::Settings;
use crate::output::emit;
use anyhow::Result;
use clubdues_core::db::Connection;
use clubdues_core::{PeriodRange, ReportService, SqliteEntityStore, TabularReport};

pub fn run(conn: &Connection, settings: &Settings, cmd: ReportCommand) -> Result<()> {
    let reports = ReportService::new(SqliteEntityStore::try_new(conn)?);
    match cmd {
        ReportCommand::Period { period, group } => {
            let report = reports.period_report(period, group)?;
            emit(settings.json, &report, &report.to_table())?;
            if !settings.json && !report.unpaid.is_empty() {
                println!("Unpaid: {}", report.unpaid.len());
            }
            Ok(())
        }
        ReportCommand::Stats { year } => {
            let stats = reports.yearly_stats(year)?;
            emit(settings.json, &stats, &stats.to_table())?;
            if !settings.json {
                println!("Total: {}", stats.total());
            }
            Ok(())
        }
        ReportCommand::History { group, from, to } => {
            let range = from.zip(to).map(|(from, to)| PeriodRange::new(from, to));
            let history = reports.payment_history(group, range)?;
            emit(settings.json, &history, &history.to_table())
        }
        ReportCommand::Roster { group } => {
            let sheet = reports.roster_sheet(group)?;
            emit(settings.json, &sheet, &sheet.to_table())
        }
    }
}
