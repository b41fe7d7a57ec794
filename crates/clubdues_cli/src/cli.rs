//! Command-line surface: global flags with environment fallbacks and the
//! subcommand tree.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clubdues_core::Period;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "clubdues")]
#[command(about = "Club roster and monthly dues ledger")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "CLUBDUES_DB", default_value = "clubdues.db")]
    pub db: PathBuf,

    /// Directory for rotated log files (logging is off when unset)
    #[arg(long, env = "CLUBDUES_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "CLUBDUES_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Backup directory (defaults to `backups` next to the database)
    #[arg(long, env = "CLUBDUES_BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Print results as JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Group commands
    Group {
        #[command(subcommand)]
        group_cmd: GroupCommand,
    },
    /// Member commands
    Member {
        #[command(subcommand)]
        member_cmd: MemberCommand,
    },
    /// Record a payment for one period
    Pay {
        /// Period as YYYY-MM
        period: Period,
        /// Member id
        #[arg(long, conflicts_with_all = ["group", "name"], required_unless_present = "name")]
        member: Option<Uuid>,
        /// Group id, used with --name
        #[arg(long, requires = "name")]
        group: Option<Uuid>,
        /// Member name inside --group
        #[arg(long, requires = "group")]
        name: Option<String>,
    },
    /// List members without a payment for a period
    Unpaid {
        /// Period as YYYY-MM
        period: Period,
        /// Restrict to one group
        #[arg(long)]
        group: Option<Uuid>,
    },
    /// Reports
    Report {
        #[command(subcommand)]
        report_cmd: ReportCommand,
    },
    /// Snapshot the database into the backup directory
    Backup,
}

#[derive(Subcommand)]
pub enum GroupCommand {
    /// List groups
    List,
    /// Create a group
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a group or change its description
    Update {
        group_id: Uuid,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a group and all of its members
    Delete { group_id: Uuid },
}

#[derive(Subcommand)]
pub enum MemberCommand {
    /// List members, optionally of one group
    List {
        #[arg(long)]
        group: Option<Uuid>,
    },
    /// Find members by name fragment
    Search {
        query: String,
        #[arg(long)]
        group: Option<Uuid>,
    },
    /// Add a member to a group
    Add {
        group_id: Uuid,
        name: String,
        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Replace a member's details
    Update {
        member_id: Uuid,
        group_id: Uuid,
        name: String,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Move a member to another group
    Move { member_id: Uuid, group_id: Uuid },
    /// Delete a member (payments are kept)
    Delete { member_id: Uuid },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Paid flags for every member in one period
    Period {
        period: Period,
        #[arg(long)]
        group: Option<Uuid>,
    },
    /// Payments per month of a year
    Stats { year: i32 },
    /// Payment listing across periods, newest first
    History {
        #[arg(long)]
        group: Option<Uuid>,
        /// First period of the range (inclusive)
        #[arg(long, requires = "to")]
        from: Option<Period>,
        /// Last period of the range (inclusive)
        #[arg(long, requires = "from")]
        to: Option<Period>,
    },
    /// Member sheet
    Roster {
        #[arg(long)]
        group: Option<Uuid>,
    },
}
