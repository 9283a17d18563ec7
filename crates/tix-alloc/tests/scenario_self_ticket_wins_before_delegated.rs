use tix_alloc::{build_pool, build_roster, PossessionLedger};
use tix_feeds::{parse_declared, parse_delegated, parse_results};
use tix_model::{Day, Slot, Venue};

/// A registrant holding both a self-applied and a delegated ticket for the
/// same slot must take the self-applied one in pass 1, leaving the delegated
/// ticket unclaimed in the surplus pool.
#[test]
fn scenario_self_ticket_wins_before_delegated() {
    let declared = parse_declared("alice\t1\t0\t1\t0\tE\tE\n").unwrap();
    let delegated = parse_delegated("bob\talice\t1\t0\t1\t0\n").unwrap();
    let results =
        parse_results("alice\t\t1\t0\t0\t0\nbob\talice\t1\t0\t0\t0\n").unwrap();

    let (roster, warnings) = build_roster(&declared, &delegated).unwrap();
    assert!(warnings.is_empty());
    let pool = build_pool(&results, &roster).unwrap();
    let mut ledger = PossessionLedger::new(&roster, pool);

    let self_claims = ledger.take_self().unwrap();
    assert_eq!(self_claims.len(), 1);
    let claimed = &ledger.tickets()[self_claims[0].ticket_id];
    assert!(claimed.is_self_applied());
    assert!(ledger.has("alice", Slot::new(Day::First, Venue::East)));

    // Pass 2 finds alice already satisfied; the delegated ticket survives.
    let delegated_claims = ledger.take_for_self().unwrap();
    assert!(delegated_claims.is_empty());

    let surplus: Vec<_> = ledger.unclaimed_ids().collect();
    assert_eq!(surplus.len(), 1);
    assert_eq!(ledger.tickets()[surplus[0]].applied_by, "bob");
}
