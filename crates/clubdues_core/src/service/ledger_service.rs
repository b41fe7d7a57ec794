//! Payment ledger use-case service.
//!
//! # Invariants
//! - Per `(member, period)` the only transition is Unpaid -> Paid.
//!   `record_payment` succeeds once; later calls report `Duplicate` and
//!   leave the single row untouched.
//! - Unpaid = current members of the group minus members holding a payment
//!   row for the period. It is recomputed on every call and never stored.
//! - `monthly_counts` lists only months that have paid rows.

use crate::error::{ClubError, ClubResult};
use crate::model::group::GroupId;
use crate::model::member::{Member, MemberId};
use crate::model::payment::PaymentId;
use crate::model::period::{validate_year, Period, PeriodRange};
use crate::repo::ledger_repo::{LedgerRepository, MemberPeriodStatus, MonthlyCount, PaymentListing};
use crate::repo::roster_repo::RosterRepository;
use crate::repo::EntityStore;
use crate::service::single_named_member;
use log::{info, warn};

/// Ledger service facade over an entity store.
pub struct LedgerService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records that `member_id` paid for `period`.
    ///
    /// The existence check and insert are one atomic unit in the store.
    /// A second call for the same key returns `ClubError::Duplicate`.
    pub fn record_payment(&self, member_id: MemberId, period: Period) -> ClubResult<PaymentId> {
        match self.store.ledger().insert_payment(member_id, period) {
            Ok(payment) => {
                info!(
                    "event=payment_record module=ledger status=ok member_id={member_id} period={period} payment_id={}",
                    payment.payment_id
                );
                Ok(payment.payment_id)
            }
            Err(err) => {
                let err = ClubError::from(err);
                if err.is_duplicate() {
                    info!(
                        "event=payment_record module=ledger status=duplicate member_id={member_id} period={period}"
                    );
                } else {
                    warn!(
                        "event=payment_record module=ledger status=error member_id={member_id} period={period} error={err}"
                    );
                }
                Err(err)
            }
        }
    }

    /// Resolves a member by name inside `group_id`, then records the payment.
    ///
    /// A name shared by several members is rejected with
    /// `AmbiguousMemberName`; nothing is recorded.
    pub fn record_payment_by_name(
        &self,
        group_id: GroupId,
        member_name: &str,
        period: Period,
    ) -> ClubResult<PaymentId> {
        self.ensure_group(group_id)?;
        let matches = self
            .store
            .roster()
            .find_members_by_name(group_id, member_name)?;
        let member = single_named_member(group_id, member_name, matches)?;
        self.record_payment(member.member_id, period)
    }

    pub fn is_paid(&self, member_id: MemberId, period: Period) -> ClubResult<bool> {
        Ok(self.store.ledger().payment_exists(member_id, period)?)
    }

    /// Paid flag for every current member (of `group_id`, when given),
    /// ordered by member name.
    pub fn payments_for_period(
        &self,
        period: Period,
        group_id: Option<GroupId>,
    ) -> ClubResult<Vec<MemberPeriodStatus>> {
        if let Some(group_id) = group_id {
            self.ensure_group(group_id)?;
        }
        Ok(self.store.ledger().period_statuses(period, group_id)?)
    }

    /// Current members of `group_id` without a payment row for `period`.
    pub fn unpaid_members(&self, period: Period, group_id: GroupId) -> ClubResult<Vec<Member>> {
        self.unpaid_members_in(period, Some(group_id))
    }

    /// Same as `unpaid_members`, across the whole club when `group_id` is `None`.
    pub fn unpaid_members_in(
        &self,
        period: Period,
        group_id: Option<GroupId>,
    ) -> ClubResult<Vec<Member>> {
        if let Some(group_id) = group_id {
            self.ensure_group(group_id)?;
        }
        let paid = self.store.ledger().paid_member_ids(period)?;
        let members = self.store.roster().list_members(group_id)?;
        Ok(members
            .into_iter()
            .filter(|member| !paid.contains(&member.member_id))
            .collect())
    }

    /// Paid counts per month for a four-digit `year`, months ascending.
    pub fn monthly_counts(&self, year: i32) -> ClubResult<Vec<MonthlyCount>> {
        let year = validate_year(year)?;
        Ok(self.store.ledger().monthly_counts(year)?)
    }

    /// Cross-period listing, newest period first, with optional filters.
    pub fn all_payments(
        &self,
        group_id: Option<GroupId>,
        range: Option<PeriodRange>,
    ) -> ClubResult<Vec<PaymentListing>> {
        if let Some(group_id) = group_id {
            self.ensure_group(group_id)?;
        }
        Ok(self.store.ledger().list_payments(group_id, range)?)
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn ensure_group(&self, group_id: GroupId) -> ClubResult<()> {
        self.store
            .roster()
            .get_group(group_id)?
            .map(|_| ())
            .ok_or(ClubError::GroupNotFound(group_id))
    }
}
