//! Ticket pool construction from results/holdings records.

use std::fmt;

use tix_feeds::ResultRecord;
use tix_model::{Ticket, SLOTS};

use crate::Roster;

/// Fatal lookup failures during pool construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A result row resolves to a beneficiary with no roster entry.
    UnknownBeneficiary {
        applied_by: String,
        applied_for: String,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBeneficiary {
                applied_by,
                applied_for,
            } => write!(
                f,
                "result row by '{applied_by}' names unknown beneficiary '{applied_for}'"
            ),
        }
    }
}

impl std::error::Error for PoolError {}

/// Materialize the ticket pool from result records.
///
/// A blank beneficiary defaults to the applicant (self-application). The
/// resolved beneficiary must be a registrant. For each of the four slots, in
/// [`SLOTS`] order, `count` independent tickets are appended; ids are dense
/// and equal to the final sequence position. Zero counts are valid in any
/// slot.
pub fn build_pool(results: &[ResultRecord], roster: &Roster) -> Result<Vec<Ticket>, PoolError> {
    let mut pool = Vec::new();
    for rec in results {
        let applied_for = rec.applied_for.as_deref().unwrap_or(&rec.applied_by);
        if !roster.contains(applied_for) {
            return Err(PoolError::UnknownBeneficiary {
                applied_by: rec.applied_by.clone(),
                applied_for: applied_for.to_string(),
            });
        }
        for slot in SLOTS {
            for _ in 0..rec.counts.for_slot(slot) {
                pool.push(Ticket::new(
                    &rec.applied_by,
                    applied_for,
                    slot.day,
                    slot.venue,
                ));
            }
        }
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_roster;
    use tix_feeds::{DeclaredRecord, VenueCode};
    use tix_model::{Day, TicketCounts, Venue};

    fn roster_of(names: &[&str]) -> Roster {
        let rows: Vec<DeclaredRecord> = names
            .iter()
            .map(|name| DeclaredRecord {
                name: name.to_string(),
                counts: TicketCounts::new(1, 0, 1, 0),
                target_day1: VenueCode::East,
                target_day2: VenueCode::East,
            })
            .collect();
        build_roster(&rows, &[]).unwrap().0
    }

    fn result(by: &str, for_: Option<&str>, counts: TicketCounts) -> ResultRecord {
        ResultRecord {
            applied_by: by.to_string(),
            applied_for: for_.map(|s| s.to_string()),
            counts,
        }
    }

    #[test]
    fn counts_expand_to_individual_tickets_in_slot_order() {
        let roster = roster_of(&["alice"]);
        let pool = build_pool(
            &[result("alice", None, TicketCounts::new(2, 0, 0, 1))],
            &roster,
        )
        .unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[0].slot(), SLOTS[0]);
        assert_eq!(pool[1].slot(), SLOTS[0]);
        assert_eq!(pool[2].slot(), SLOTS[3]);
        assert_eq!(pool[2].day, Day::Second);
        assert_eq!(pool[2].venue, Venue::West);
    }

    #[test]
    fn blank_beneficiary_defaults_to_applicant() {
        let roster = roster_of(&["alice"]);
        let pool = build_pool(
            &[result("alice", None, TicketCounts::new(1, 0, 0, 0))],
            &roster,
        )
        .unwrap();
        assert!(pool[0].is_self_applied());
        assert_eq!(pool[0].applied_for, "alice");
    }

    #[test]
    fn explicit_beneficiary_is_recorded() {
        let roster = roster_of(&["alice"]);
        let pool = build_pool(
            &[result("erin", Some("alice"), TicketCounts::new(1, 0, 0, 0))],
            &roster,
        )
        .unwrap();
        assert_eq!(pool[0].applied_by, "erin");
        assert_eq!(pool[0].applied_for, "alice");
    }

    #[test]
    fn zero_count_rows_add_nothing() {
        let roster = roster_of(&["alice"]);
        let pool = build_pool(
            &[result("alice", None, TicketCounts::new(0, 0, 0, 0))],
            &roster,
        )
        .unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn unknown_beneficiary_is_fatal() {
        let roster = roster_of(&["alice"]);
        let err = build_pool(
            &[result("erin", Some("ghost"), TicketCounts::new(1, 0, 0, 0))],
            &roster,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PoolError::UnknownBeneficiary {
                applied_by: "erin".to_string(),
                applied_for: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn unregistered_self_applicant_is_fatal() {
        // Blank beneficiary resolves to the applicant, who must be registered.
        let roster = roster_of(&["alice"]);
        let err = build_pool(
            &[result("ghost", None, TicketCounts::new(1, 0, 0, 0))],
            &roster,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PoolError::UnknownBeneficiary {
                applied_by: "ghost".to_string(),
                applied_for: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn ids_are_dense_across_rows() {
        let roster = roster_of(&["alice", "bob"]);
        let pool = build_pool(
            &[
                result("alice", None, TicketCounts::new(1, 0, 0, 0)),
                result("bob", None, TicketCounts::new(0, 2, 0, 0)),
            ],
            &roster,
        )
        .unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[1].applied_by, "bob");
        assert_eq!(pool[2].applied_by, "bob");
    }
}
