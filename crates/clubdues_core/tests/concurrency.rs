use clubdues_core::db::open_db;
use clubdues_core::{
    ClubError, ClubResult, EntityStore, LedgerService, MemberDraft, Period, RosterRepository,
    RosterService, SqliteEntityStore, SqliteRosterRepository,
};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn concurrent_record_payment_admits_exactly_one_writer() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("club.db");

    let setup = open_db(&db_path).unwrap();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&setup).unwrap());
    let group = roster.create_group("Juniors", None).unwrap();
    let alex = roster.add_member(MemberDraft::named("Alex"), group).unwrap();
    let march = Period::parse("2024-03").unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let conn = open_db(&db_path).unwrap();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let ledger = LedgerService::new(SqliteEntityStore::try_new(&conn).unwrap());
                barrier.wait();
                ledger.record_payment(alex, march)
            })
        })
        .collect();

    let results: Vec<Result<_, ClubError>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|result| matches!(result, Err(err) if err.is_duplicate()))
        .count();
    assert_eq!(successes, 1, "results: {results:?}");
    assert_eq!(duplicates, 1, "results: {results:?}");

    let rows: i64 = setup
        .query_row(
            "SELECT COUNT(*) FROM payments WHERE member_uuid = ?1 AND period = ?2;",
            [alex.to_string(), march.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn consistent_read_blocks_writers_until_it_finishes() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("club.db");

    let reader = open_db(&db_path).unwrap();
    let roster = RosterService::new(SqliteRosterRepository::try_new(&reader).unwrap());
    let group = roster.create_group("Juniors", None).unwrap();

    let writer = open_db(&db_path).unwrap();
    writer.busy_timeout(Duration::ZERO).unwrap();
    let writer_roster = RosterService::new(SqliteRosterRepository::try_new(&writer).unwrap());

    let store = SqliteEntityStore::try_new(&reader).unwrap();
    let seen = store
        .read_consistent(|store| -> ClubResult<usize> {
            let before = store.roster().list_members(Some(group))?.len();
            let blocked = writer_roster.add_member(MemberDraft::named("Alex"), group);
            assert!(matches!(blocked, Err(ClubError::StoreUnavailable(_))));
            let after = store.roster().list_members(Some(group))?.len();
            assert_eq!(before, after);
            Ok(after)
        })
        .unwrap();
    assert_eq!(seen, 0);

    writer_roster
        .add_member(MemberDraft::named("Alex"), group)
        .unwrap();
    assert_eq!(roster.list_members(Some(group)).unwrap().len(), 1);
}
