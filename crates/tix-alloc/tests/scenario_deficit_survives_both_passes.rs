use tix_alloc::{build_pool, build_roster, PossessionLedger};
use tix_feeds::{parse_declared, parse_results};
use tix_model::{Day, Slot, Venue};

/// A desired slot with no claimable ticket anywhere is not an error: both
/// passes complete and the registrant simply remains unsatisfied.
#[test]
fn scenario_deficit_survives_both_passes() {
    let declared = parse_declared("carol\t1\t0\t0\t1\tE\tW\n").unwrap();
    // Carol holds a day-1 east ticket but nothing for day-2 west.
    let results = parse_results("carol\t\t1\t0\t0\t0\n").unwrap();

    let (roster, _) = build_roster(&declared, &[]).unwrap();
    let pool = build_pool(&results, &roster).unwrap();
    let mut ledger = PossessionLedger::new(&roster, pool);

    let outcome = ledger.allocate().unwrap();
    assert_eq!(outcome.self_claims.len(), 1);
    assert!(outcome.delegated_claims.is_empty());

    assert!(ledger.has("carol", Slot::new(Day::First, Venue::East)));
    assert!(!ledger.has("carol", Slot::new(Day::Second, Venue::West)));
    assert_eq!(ledger.unclaimed_len(), 0);
}
