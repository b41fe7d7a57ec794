use crate::config::Settings;
use crate::output::emit;
use anyhow::{bail, Result};
use clubdues_core::db::Connection;
use clubdues_core::{
    ClubError, GroupId, LedgerService, MemberId, Period, RosterSheet, SqliteEntityStore,
    TabularReport,
};

pub fn cmd_pay(
    conn: &Connection,
    period: Period,
    member: Option<MemberId>,
    group: Option<GroupId>,
    name: Option<String>,
) -> Result<()> {
    let ledger = LedgerService::new(SqliteEntityStore::try_new(conn)?);
    let result = match (member, group, name) {
        (Some(member_id), _, _) => ledger.record_payment(member_id, period),
        (None, Some(group_id), Some(name)) => ledger.record_payment_by_name(group_id, &name, period),
        _ => bail!("either --member or both --group and --name are required"),
    };

    match result {
        Ok(payment_id) => {
            println!("Payment recorded for {period}: {payment_id}");
            Ok(())
        }
        // Paying twice is reported, not treated as a failure.
        Err(ClubError::Duplicate { member_id, period }) => {
            println!("Already paid: member {member_id} for {period}");
            Ok(())
        }
        Err(ClubError::AmbiguousMemberName { name, candidates, .. }) => {
            let ids = candidates
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            bail!("several members are named `{name}`; pass --member with one of: {ids}")
        }
        Err(err) => Err(err.into()),
    }
}

pub fn cmd_unpaid(
    conn: &Connection,
    settings: &Settings,
    period: Period,
    group: Option<GroupId>,
) -> Result<()> {
    let ledger = LedgerService::new(SqliteEntityStore::try_new(conn)?);
    let sheet = RosterSheet {
        members: ledger.unpaid_members_in(period, group)?,
    };
    emit(settings.json, &sheet.members, &sheet.to_table())
}
