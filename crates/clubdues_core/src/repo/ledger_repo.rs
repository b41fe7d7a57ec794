//! Payment ledger repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one `payments` row exists per `(member_uuid, period)`; the
//!   `uq_payments_member_period` constraint is the arbiter, so concurrent
//!   writers on separate connections cannot both succeed.
//! - Group filters always use the member's *current* group.
//! - Payment rows are never updated or deleted here.

use super::{ensure_connection_ready, member_exists, parse_period, parse_uuid, RepoError, RepoResult};
use crate::model::group::GroupId;
use crate::model::member::MemberId;
use crate::model::payment::{Payment, PaymentId};
use crate::model::period::{Period, PeriodRange};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::BTreeSet;

/// Paid/unpaid status of one current member for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPeriodStatus {
    pub member_id: MemberId,
    pub member_name: String,
    pub paid: bool,
}

/// Number of paid rows for one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Month number in `1..=12`.
    pub month: u8,
    pub count: u64,
}

/// One row of the cross-period payment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentListing {
    pub payment_id: PaymentId,
    pub period: Period,
    pub member_name: String,
    pub group_name: String,
    pub paid: bool,
}

/// Repository interface for payment persistence and aggregate queries.
pub trait LedgerRepository {
    /// Atomically inserts a paid row for `(member_id, period)`.
    ///
    /// Fails with `MemberNotFound` for unknown members and with
    /// `DuplicatePayment` when the key already has a row.
    fn insert_payment(&self, member_id: MemberId, period: Period) -> RepoResult<Payment>;
    fn payment_exists(&self, member_id: MemberId, period: Period) -> RepoResult<bool>;
    /// Ids of members holding a paid row for `period`, including deleted ones.
    fn paid_member_ids(&self, period: Period) -> RepoResult<BTreeSet<MemberId>>;
    /// Every current member (optionally of one group) with its paid flag,
    /// ordered by member name.
    fn period_statuses(
        &self,
        period: Period,
        group_id: Option<GroupId>,
    ) -> RepoResult<Vec<MemberPeriodStatus>>;
    /// Paid counts per month of `year`; months without rows are absent.
    fn monthly_counts(&self, year: u16) -> RepoResult<Vec<MonthlyCount>>;
    /// Payments joined to current member and group, newest period first.
    fn list_payments(
        &self,
        group_id: Option<GroupId>,
        range: Option<PeriodRange>,
    ) -> RepoResult<Vec<PaymentListing>>;
}

/// SQLite-backed ledger repository.
#[derive(Clone, Copy)]
pub struct SqliteLedgerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLedgerRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["members", "groups", "payments"])?;
        Ok(Self { conn })
    }
}

impl LedgerRepository for SqliteLedgerRepository<'_> {
    fn insert_payment(&self, member_id: MemberId, period: Period) -> RepoResult<Payment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !member_exists(&tx, member_id)? {
            return Err(RepoError::MemberNotFound(member_id));
        }

        let payment = Payment::paid(member_id, period);
        let inserted = tx.execute(
            "INSERT INTO payments (payment_uuid, member_uuid, period, paid)
             VALUES (?1, ?2, ?3, 1);",
            params![
                payment.payment_id.to_string(),
                member_id.to_string(),
                period.to_string(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicatePayment { member_id, period });
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit()?;
        Ok(payment)
    }

    fn payment_exists(&self, member_id: MemberId, period: Period) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM payments
                WHERE member_uuid = ?1
                  AND period = ?2
                  AND paid = 1
            );",
            params![member_id.to_string(), period.to_string()],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    fn paid_member_ids(&self, period: Period) -> RepoResult<BTreeSet<MemberId>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_uuid
             FROM payments
             WHERE period = ?1
               AND paid = 1;",
        )?;
        let mut rows = stmt.query([period.to_string()])?;
        let mut ids = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.insert(parse_uuid(&value, "payments.member_uuid")?);
        }
        Ok(ids)
    }

    fn period_statuses(
        &self,
        period: Period,
        group_id: Option<GroupId>,
    ) -> RepoResult<Vec<MemberPeriodStatus>> {
        let mut sql = String::from(
            "SELECT
                m.member_uuid AS member_uuid,
                m.name AS name,
                EXISTS(
                    SELECT 1
                    FROM payments p
                    WHERE p.member_uuid = m.member_uuid
                      AND p.period = ?1
                      AND p.paid = 1
                ) AS paid
             FROM members m",
        );
        let mut bind_values = vec![Value::Text(period.to_string())];
        if let Some(group_id) = group_id {
            sql.push_str(" WHERE m.group_uuid = ?2");
            bind_values.push(Value::Text(group_id.to_string()));
        }
        sql.push_str(" ORDER BY m.name ASC, m.member_uuid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut statuses = Vec::new();
        while let Some(row) = rows.next()? {
            let member_text: String = row.get("member_uuid")?;
            statuses.push(MemberPeriodStatus {
                member_id: parse_uuid(&member_text, "members.member_uuid")?,
                member_name: row.get("name")?,
                paid: row.get::<_, i64>("paid")? == 1,
            });
        }
        Ok(statuses)
    }

    fn monthly_counts(&self, year: u16) -> RepoResult<Vec<MonthlyCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                CAST(substr(period, 6, 2) AS INTEGER) AS month,
                COUNT(*) AS payment_count
             FROM payments
             WHERE substr(period, 1, 4) = ?1
               AND paid = 1
             GROUP BY substr(period, 6, 2)
             ORDER BY month ASC;",
        )?;
        let mut rows = stmt.query([format!("{year:04}")])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            let month: i64 = row.get("month")?;
            let count: i64 = row.get("payment_count")?;
            let month = u8::try_from(month)
                .ok()
                .filter(|value| (1..=12).contains(value))
                .ok_or_else(|| {
                    RepoError::InvalidData(format!("invalid month `{month}` in payments.period"))
                })?;
            counts.push(MonthlyCount {
                month,
                count: u64::try_from(count).unwrap_or_default(),
            });
        }
        Ok(counts)
    }

    fn list_payments(
        &self,
        group_id: Option<GroupId>,
        range: Option<PeriodRange>,
    ) -> RepoResult<Vec<PaymentListing>> {
        let mut sql = String::from(
            "SELECT
                p.payment_uuid AS payment_uuid,
                p.period AS period,
                m.name AS member_name,
                g.name AS group_name,
                p.paid AS paid
             FROM payments p
             INNER JOIN members m ON m.member_uuid = p.member_uuid
             INNER JOIN groups g ON g.group_uuid = m.group_uuid
             WHERE 1 = 1",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(range) = range {
            sql.push_str(" AND p.period BETWEEN ? AND ?");
            bind_values.push(Value::Text(range.from.to_string()));
            bind_values.push(Value::Text(range.to.to_string()));
        }
        if let Some(group_id) = group_id {
            sql.push_str(" AND m.group_uuid = ?");
            bind_values.push(Value::Text(group_id.to_string()));
        }
        sql.push_str(" ORDER BY p.period DESC, m.name ASC, p.payment_uuid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next()? {
            let payment_text: String = row.get("payment_uuid")?;
            let period_text: String = row.get("period")?;
            listings.push(PaymentListing {
                payment_id: parse_uuid(&payment_text, "payments.payment_uuid")?,
                period: parse_period(&period_text, "payments.period")?,
                member_name: row.get("member_name")?,
                group_name: row.get("group_name")?,
                paid: row.get::<_, i64>("paid")? == 1,
            });
        }
        Ok(listings)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
