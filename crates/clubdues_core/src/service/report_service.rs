//! Read-only reporting projections over the ledger and roster.
//!
//! # Invariants
//! - No mutation; every report is recomputed from store queries.
//! - Unpaid members come from `LedgerService`, never from local logic.
//! - Empty results render as a table with columns and zero rows.

use crate::error::ClubResult;
use crate::model::group::{Group, GroupId};
use crate::model::member::Member;
use crate::model::period::{month_name, Period, PeriodRange};
use crate::repo::ledger_repo::{MemberPeriodStatus, PaymentListing};
use crate::repo::roster_repo::RosterRepository;
use crate::repo::EntityStore;
use crate::service::ledger_service::LedgerService;
use serde::Serialize;

/// Flat, format-agnostic table consumed by export tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| (*column).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reports that can be flattened into a `Table`.
pub trait TabularReport {
    fn to_table(&self) -> Table;
}

/// Paid/unpaid view of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub period: Period,
    pub group: Option<Group>,
    /// Every current member in scope, ordered by name.
    pub rows: Vec<MemberPeriodStatus>,
    pub unpaid: Vec<Member>,
}

impl TabularReport for PeriodReport {
    fn to_table(&self) -> Table {
        let mut table = Table::with_columns(&["member", "paid", "period"]);
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.member_name.clone(),
                    yes_no(row.paid),
                    self.period.to_string(),
                ]
            })
            .collect();
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStatRow {
    pub month: u8,
    pub month_name: &'static str,
    pub count: u64,
}

/// Month-by-month paid counts of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyStats {
    pub year: i32,
    /// Only months with at least one payment, ascending.
    pub rows: Vec<MonthlyStatRow>,
}

impl YearlyStats {
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}

impl TabularReport for YearlyStats {
    fn to_table(&self) -> Table {
        let mut table = Table::with_columns(&["month", "payments"]);
        table.rows = self
            .rows
            .iter()
            .map(|row| vec![row.month_name.to_string(), row.count.to_string()])
            .collect();
        table
    }
}

/// Cross-period payment listing, newest period first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentHistory {
    pub rows: Vec<PaymentListing>,
}

impl TabularReport for PaymentHistory {
    fn to_table(&self) -> Table {
        let mut table = Table::with_columns(&["period", "member", "group", "paid"]);
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.period.to_string(),
                    row.member_name.clone(),
                    row.group_name.clone(),
                    yes_no(row.paid),
                ]
            })
            .collect();
        table
    }
}

/// Member listing sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSheet {
    pub members: Vec<Member>,
}

impl TabularReport for RosterSheet {
    fn to_table(&self) -> Table {
        let mut table = Table::with_columns(&["id", "name", "birth_date", "phone"]);
        table.rows = self
            .members
            .iter()
            .map(|member| {
                vec![
                    member.member_id.to_string(),
                    member.name.clone(),
                    member
                        .birth_date
                        .map(|date| date.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    member.phone.clone().unwrap_or_default(),
                ]
            })
            .collect();
        table
    }
}

/// Reporting facade composing ledger and roster queries.
pub struct ReportService<S: EntityStore> {
    ledger: LedgerService<S>,
}

impl<S: EntityStore> ReportService<S> {
    pub fn new(store: S) -> Self {
        Self {
            ledger: LedgerService::new(store),
        }
    }

    /// Paid flags and Ledger-computed unpaid members for one period,
    /// read from a single store snapshot.
    pub fn period_report(&self, period: Period, group_id: Option<GroupId>) -> ClubResult<PeriodReport> {
        self.ledger.store().read_consistent(|store| -> ClubResult<PeriodReport> {
            let group = match group_id {
                Some(group_id) => store.roster().get_group(group_id)?,
                None => None,
            };
            let rows = self.ledger.payments_for_period(period, group_id)?;
            let unpaid = self.ledger.unpaid_members_in(period, group_id)?;
            Ok(PeriodReport {
                period,
                group,
                rows,
                unpaid,
            })
        })
    }

    /// Month-by-month paid counts; months without payments are omitted.
    pub fn yearly_stats(&self, year: i32) -> ClubResult<YearlyStats> {
        let rows = self
            .ledger
            .monthly_counts(year)?
            .into_iter()
            .filter_map(|count| {
                month_name(count.month).map(|name| MonthlyStatRow {
                    month: count.month,
                    month_name: name,
                    count: count.count,
                })
            })
            .collect();
        Ok(YearlyStats { year, rows })
    }

    pub fn payment_history(
        &self,
        group_id: Option<GroupId>,
        range: Option<PeriodRange>,
    ) -> ClubResult<PaymentHistory> {
        Ok(PaymentHistory {
            rows: self.ledger.all_payments(group_id, range)?,
        })
    }

    pub fn roster_sheet(&self, group_id: Option<GroupId>) -> ClubResult<RosterSheet> {
        if let Some(group_id) = group_id {
            self.ledger.ensure_group(group_id)?;
        }
        Ok(RosterSheet {
            members: self.ledger.store().roster().list_members(group_id)?,
        })
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}
