//! Core domain logic for the club dues ledger.
//! This crate is the single source of truth for roster and payment invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::{ClubError, ClubResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::group::{Group, GroupId};
pub use model::member::{Member, MemberDraft, MemberId};
pub use model::payment::{Payment, PaymentId};
pub use model::period::{month_name, Period, PeriodRange};
pub use model::ValidationError;
pub use repo::ledger_repo::{
    LedgerRepository, MemberPeriodStatus, MonthlyCount, PaymentListing, SqliteLedgerRepository,
};
pub use repo::roster_repo::{RosterRepository, SqliteRosterRepository};
pub use repo::{EntityStore, RepoError, RepoResult, SqliteEntityStore};
pub use service::ledger_service::LedgerService;
pub use service::report_service::{
    MonthlyStatRow, PaymentHistory, PeriodReport, ReportService, RosterSheet, Table,
    TabularReport, YearlyStats,
};
pub use service::roster_service::RosterService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
