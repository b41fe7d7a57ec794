use clubdues_core::db::open_db_in_memory;
use clubdues_core::{
    ClubError, GroupId, LedgerService, MemberDraft, MemberId, Period, PeriodRange, RosterService,
    SqliteEntityStore, SqliteRosterRepository, ValidationError,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn period(text: &str) -> Period {
    Period::parse(text).unwrap()
}

fn payment_rows(conn: &Connection, member_id: MemberId, period: Period) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM payments WHERE member_uuid = ?1 AND period = ?2;",
        [member_id.to_string(), period.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

struct Club {
    juniors: GroupId,
    seniors: GroupId,
    alex: MemberId,
    maria: MemberId,
    boris: MemberId,
}

fn seed(roster: &RosterService<SqliteRosterRepository<'_>>) -> Club {
    let juniors = roster.create_group("Juniors", None).unwrap();
    let seniors = roster.create_group("Seniors", None).unwrap();
    let alex = roster.add_member(MemberDraft::named("Alex"), juniors).unwrap();
    let maria = roster.add_member(MemberDraft::named("Maria"), juniors).unwrap();
    let boris = roster.add_member(MemberDraft::named("Boris"), seniors).unwrap();
    Club {
        juniors,
        seniors,
        alex,
        maria,
        boris,
    }
}

#[test]
fn record_payment_then_duplicate_keeps_single_row() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let march = period("2024-03");

    let unpaid: Vec<String> = ledger
        .unpaid_members(march, club.juniors)
        .unwrap()
        .into_iter()
        .map(|member| member.name)
        .collect();
    assert_eq!(unpaid, vec!["Alex", "Maria"]);

    ledger.record_payment(club.alex, march).unwrap();
    assert!(ledger.is_paid(club.alex, march).unwrap());

    let unpaid: Vec<String> = ledger
        .unpaid_members(march, club.juniors)
        .unwrap()
        .into_iter()
        .map(|member| member.name)
        .collect();
    assert_eq!(unpaid, vec!["Maria"]);

    let err = ledger.record_payment(club.alex, march).unwrap_err();
    assert!(err.is_duplicate());
    assert!(matches!(
        err,
        ClubError::Duplicate { member_id, period } if member_id == club.alex && period == march
    ));
    assert_eq!(payment_rows(&conn, club.alex, march), 1);
}

#[test]
fn reassigned_member_keeps_payment_and_moves_groups() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let march = period("2024-03");
    ledger.record_payment(club.alex, march).unwrap();

    roster.reassign_member(club.alex, club.seniors).unwrap();

    let seniors: Vec<(String, bool)> = ledger
        .payments_for_period(march, Some(club.seniors))
        .unwrap()
        .into_iter()
        .map(|status| (status.member_name, status.paid))
        .collect();
    assert_eq!(
        seniors,
        vec![("Alex".to_string(), true), ("Boris".to_string(), false)]
    );

    let juniors: Vec<String> = ledger
        .payments_for_period(march, Some(club.juniors))
        .unwrap()
        .into_iter()
        .map(|status| status.member_name)
        .collect();
    assert_eq!(juniors, vec!["Maria"]);

    let history = ledger.all_payments(Some(club.seniors), None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].group_name, "Seniors");
}

#[test]
fn unpaid_and_paid_partition_the_group() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let april = period("2024-04");
    ledger.record_payment(club.maria, april).unwrap();
    ledger.record_payment(club.boris, april).unwrap();

    let members: BTreeSet<MemberId> = roster
        .list_members(Some(club.juniors))
        .unwrap()
        .into_iter()
        .map(|member| member.member_id)
        .collect();
    let unpaid: BTreeSet<MemberId> = ledger
        .unpaid_members(april, club.juniors)
        .unwrap()
        .into_iter()
        .map(|member| member.member_id)
        .collect();
    let paid: BTreeSet<MemberId> = ledger
        .payments_for_period(april, Some(club.juniors))
        .unwrap()
        .into_iter()
        .filter(|status| status.paid)
        .map(|status| status.member_id)
        .collect();

    assert!(unpaid.is_disjoint(&paid));
    let union: BTreeSet<MemberId> = unpaid.union(&paid).copied().collect();
    assert_eq!(union, members);
    assert_eq!(unpaid, BTreeSet::from([club.alex]));
}

#[test]
fn unpaid_across_club_without_group_filter() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let may = period("2024-05");
    ledger.record_payment(club.maria, may).unwrap();

    let names: Vec<String> = ledger
        .unpaid_members_in(may, None)
        .unwrap()
        .into_iter()
        .map(|member| member.name)
        .collect();
    assert_eq!(names, vec!["Alex", "Boris"]);
}

#[test]
fn unknown_ids_are_reported_not_found() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    seed(&roster);
    let march = period("2024-03");

    let ghost = Uuid::new_v4();
    let err = ledger.record_payment(ghost, march).unwrap_err();
    assert!(matches!(err, ClubError::MemberNotFound(id) if id == ghost));

    let err = ledger.unpaid_members(march, ghost).unwrap_err();
    assert!(matches!(err, ClubError::GroupNotFound(id) if id == ghost));

    let err = ledger.payments_for_period(march, Some(ghost)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn record_payment_by_name_resolves_within_group() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let june = period("2024-06");

    ledger
        .record_payment_by_name(club.juniors, " Alex ", june)
        .unwrap();
    assert!(ledger.is_paid(club.alex, june).unwrap());

    let err = ledger
        .record_payment_by_name(club.juniors, "Boris", june)
        .unwrap_err();
    assert!(matches!(
        err,
        ClubError::MemberNameNotFound { ref name, .. } if name == "Boris"
    ));

    let err = ledger
        .record_payment_by_name(club.juniors, "Alex", june)
        .unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn monthly_counts_skip_empty_months_and_sum_to_rows() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);

    ledger.record_payment(club.alex, period("2024-01")).unwrap();
    ledger.record_payment(club.maria, period("2024-01")).unwrap();
    ledger.record_payment(club.boris, period("2024-11")).unwrap();
    ledger.record_payment(club.alex, period("2023-11")).unwrap();

    let counts: Vec<(u8, u64)> = ledger
        .monthly_counts(2024)
        .unwrap()
        .into_iter()
        .map(|count| (count.month, count.count))
        .collect();
    assert_eq!(counts, vec![(1, 2), (11, 1)]);

    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM payments WHERE period LIKE '2024-%';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total, rows as u64);

    assert!(ledger.monthly_counts(1999).unwrap().is_empty());
}

#[test]
fn monthly_counts_rejects_non_four_digit_year() {
    let conn = setup();
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());

    let err = ledger.monthly_counts(24).unwrap_err();
    assert!(matches!(
        err,
        ClubError::Validation(ValidationError::InvalidYear(24))
    ));
}

#[test]
fn all_payments_filters_by_range_newest_first() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);

    for text in ["2024-01", "2024-02", "2024-03", "2024-04"] {
        ledger.record_payment(club.alex, period(text)).unwrap();
    }
    ledger.record_payment(club.boris, period("2024-03")).unwrap();

    let listed: Vec<(String, String)> = ledger
        .all_payments(
            None,
            Some(PeriodRange::new(period("2024-02"), period("2024-03"))),
        )
        .unwrap()
        .into_iter()
        .map(|row| (row.period.to_string(), row.member_name))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("2024-03".to_string(), "Alex".to_string()),
            ("2024-03".to_string(), "Boris".to_string()),
            ("2024-02".to_string(), "Alex".to_string()),
        ]
    );

    let inverted = ledger
        .all_payments(
            None,
            Some(PeriodRange::new(period("2024-04"), period("2024-01"))),
        )
        .unwrap();
    assert!(inverted.is_empty());
}

#[test]
fn juniors_scenario_end_to_end() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());

    let juniors = roster.create_group("Juniors", None).unwrap();
    let alex = roster.add_member(MemberDraft::named("Alex"), juniors).unwrap();
    let march = period("2024-03");

    let payment_id = ledger.record_payment(alex, march).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT payment_uuid FROM payments WHERE member_uuid = ?1;",
            [alex.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, payment_id.to_string());

    assert!(ledger.record_payment(alex, march).unwrap_err().is_duplicate());
    assert!(ledger.unpaid_members(march, juniors).unwrap().is_empty());

    let april: Vec<String> = ledger
        .unpaid_members(period("2024-04"), juniors)
        .unwrap()
        .into_iter()
        .map(|member| member.name)
        .collect();
    assert_eq!(april, vec!["Alex"]);
}

#[test]
fn record_payment_by_shared_name_records_nothing() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let juniors = roster.create_group("Juniors", None).unwrap();
    let first = roster.add_member(MemberDraft::named("Alex"), juniors).unwrap();
    let second = roster.add_member(MemberDraft::named("Alex"), juniors).unwrap();
    let march = period("2024-03");

    let err = ledger
        .record_payment_by_name(juniors, "Alex", march)
        .unwrap_err();
    assert!(!err.is_duplicate());
    assert!(matches!(
        err,
        ClubError::AmbiguousMemberName { ref candidates, .. } if candidates.len() == 2
    ));
    assert!(!ledger.is_paid(first, march).unwrap());
    assert!(!ledger.is_paid(second, march).unwrap());

    // Both namesakes stay payable by id.
    ledger.record_payment(first, march).unwrap();
    ledger.record_payment(second, march).unwrap();
    assert!(ledger.unpaid_members(march, juniors).unwrap().is_empty());
}

#[test]
fn payments_for_period_without_group_covers_whole_club() {
    let conn = setup();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&conn).unwrap());
    let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
    let club = seed(&roster);
    let march = period("2024-03");
    ledger.record_payment(club.boris, march).unwrap();

    let statuses: Vec<(String, bool)> = ledger
        .payments_for_period(march, None)
        .unwrap()
        .into_iter()
        .map(|status| (status.member_name, status.paid))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("Alex".to_string(), false),
            ("Boris".to_string(), true),
            ("Maria".to_string(), false),
        ]
    );
}
