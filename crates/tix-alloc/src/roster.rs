//! Roster construction from declared and delegated records.
//!
//! The derived venue per day comes from the count pair: a nonzero east count
//! means east, otherwise west (the parse layer guarantees exactly one side is
//! nonzero). The declared target code is cross-checked against the derived
//! venue; a disagreement is a collected warning and the derived value is the
//! one recorded.

use std::collections::BTreeMap;
use std::fmt;

use tix_feeds::{DeclaredRecord, DelegatedRecord};
use tix_model::{Day, Registrant, TicketCounts, Venue};

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Fatal lookup failures during roster construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterError {
    /// A delegated application names a beneficiary with no declared entry.
    UnknownBeneficiary {
        applied_by: String,
        applied_for: String,
    },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBeneficiary {
                applied_by,
                applied_for,
            } => write!(
                f,
                "delegated application by '{applied_by}' names unknown beneficiary '{applied_for}'"
            ),
        }
    }
}

impl std::error::Error for RosterError {}

/// Non-fatal data-quality findings collected during roster construction.
/// The run continues; callers decide how to surface them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreferenceWarning {
    /// A registrant's own application counts imply a different venue than
    /// their declared target.
    DeclaredMismatch {
        name: String,
        day: Day,
        applied: Venue,
        wants: Venue,
    },
    /// Tickets held on a registrant's behalf imply a different venue than
    /// the registrant's established preference.
    DelegatedMismatch {
        applied_by: String,
        applied_for: String,
        day: Day,
        received: Venue,
        wants: Venue,
    },
}

impl fmt::Display for PreferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclaredMismatch {
                name,
                day,
                applied,
                wants,
            } => write!(f, "{name} applied for {applied} but wants {wants} on {day}"),
            Self::DelegatedMismatch {
                applied_by,
                applied_for,
                day,
                received,
                wants,
            } => write!(
                f,
                "{applied_for} received {received} from {applied_by} but wants {wants} on {day}"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// All registrants for a run, in declared-row insertion order with by-name
/// lookup. Allocation passes iterate in insertion order, so the order vector
/// is part of the contract, not a convenience.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    order: Vec<String>,
    by_name: BTreeMap<String, Registrant>,
}

impl Roster {
    fn insert(&mut self, registrant: Registrant) {
        // A duplicate name replaces the entry but keeps its first position.
        if !self.by_name.contains_key(&registrant.name) {
            self.order.push(registrant.name.clone());
        }
        self.by_name.insert(registrant.name.clone(), registrant);
    }

    pub fn get(&self, name: &str) -> Option<&Registrant> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registrants in declared-row insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Registrant> {
        self.order.iter().map(|name| &self.by_name[name])
    }

    /// Names in declared-row insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn derived_venue(counts: &TicketCounts, day: Day) -> Venue {
    let (east, _west) = counts.day_pair(day);
    if east > 0 {
        Venue::East
    } else {
        Venue::West
    }
}

/// Build the roster from declared rows, then cross-check delegated rows
/// against it.
///
/// Per day: a declared code of X (no opinion) records no desired venue.
/// Otherwise the desired venue is the one derived from the counts; if the
/// declared code disagrees, a [`PreferenceWarning::DeclaredMismatch`] is
/// collected and the derived value wins.
///
/// Delegated rows never add registrants. The beneficiary must already exist
/// (fatal otherwise); the applicant is not required to. For each day where
/// the beneficiary has an established preference, the venue implied by the
/// applicant's counts is cross-checked and a mismatch collects a
/// [`PreferenceWarning::DelegatedMismatch`].
pub fn build_roster(
    declared: &[DeclaredRecord],
    delegated: &[DelegatedRecord],
) -> Result<(Roster, Vec<PreferenceWarning>), RosterError> {
    let mut roster = Roster::default();
    let mut warnings = Vec::new();

    for rec in declared {
        let mut registrant = Registrant::new(&rec.name);
        for (day, code) in [(Day::First, rec.target_day1), (Day::Second, rec.target_day2)] {
            let declared_venue = match code.venue() {
                Some(v) => v,
                None => continue,
            };
            let applied = derived_venue(&rec.counts, day);
            if applied != declared_venue {
                warnings.push(PreferenceWarning::DeclaredMismatch {
                    name: rec.name.clone(),
                    day,
                    applied,
                    wants: declared_venue,
                });
            }
            registrant.wants.insert(day, applied);
        }
        roster.insert(registrant);
    }

    for rec in delegated {
        let beneficiary = match roster.get(&rec.applied_for) {
            Some(r) => r,
            None => {
                return Err(RosterError::UnknownBeneficiary {
                    applied_by: rec.applied_by.clone(),
                    applied_for: rec.applied_for.clone(),
                })
            }
        };
        for day in [Day::First, Day::Second] {
            let wants = match beneficiary.wants_at(day) {
                Some(v) => v,
                None => continue,
            };
            let received = derived_venue(&rec.counts, day);
            if received != wants {
                warnings.push(PreferenceWarning::DelegatedMismatch {
                    applied_by: rec.applied_by.clone(),
                    applied_for: rec.applied_for.clone(),
                    day,
                    received,
                    wants,
                });
            }
        }
    }

    Ok((roster, warnings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tix_feeds::VenueCode;

    fn declared(name: &str, counts: TicketCounts, d1: VenueCode, d2: VenueCode) -> DeclaredRecord {
        DeclaredRecord {
            name: name.to_string(),
            counts,
            target_day1: d1,
            target_day2: d2,
        }
    }

    fn delegated(by: &str, for_: &str, counts: TicketCounts) -> DelegatedRecord {
        DelegatedRecord {
            applied_by: by.to_string(),
            applied_for: for_.to_string(),
            counts,
        }
    }

    // --- Derivation ---

    #[test]
    fn matching_counts_and_code_record_preference_without_warning() {
        let rows = [declared(
            "alice",
            TicketCounts::new(2, 0, 0, 1),
            VenueCode::East,
            VenueCode::West,
        )];
        let (roster, warnings) = build_roster(&rows, &[]).unwrap();
        assert!(warnings.is_empty());
        let alice = roster.get("alice").unwrap();
        assert_eq!(alice.wants_at(Day::First), Some(Venue::East));
        assert_eq!(alice.wants_at(Day::Second), Some(Venue::West));
    }

    #[test]
    fn mismatch_warns_and_derived_value_wins() {
        let rows = [declared(
            "alice",
            TicketCounts::new(2, 0, 0, 1),
            VenueCode::West,
            VenueCode::West,
        )];
        let (roster, warnings) = build_roster(&rows, &[]).unwrap();
        assert_eq!(
            warnings,
            vec![PreferenceWarning::DeclaredMismatch {
                name: "alice".to_string(),
                day: Day::First,
                applied: Venue::East,
                wants: Venue::West,
            }]
        );
        // Derived venue, not the declared label, is recorded.
        assert_eq!(
            roster.get("alice").unwrap().wants_at(Day::First),
            Some(Venue::East)
        );
    }

    #[test]
    fn no_opinion_records_no_preference_for_that_day() {
        let rows = [declared(
            "carol",
            TicketCounts::new(1, 0, 1, 0),
            VenueCode::East,
            VenueCode::NoOpinion,
        )];
        let (roster, warnings) = build_roster(&rows, &[]).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(roster.get("carol").unwrap().wants_at(Day::Second), None);
    }

    // --- Insertion order ---

    #[test]
    fn iteration_follows_declared_row_order() {
        let rows = [
            declared("zoe", TicketCounts::new(1, 0, 1, 0), VenueCode::East, VenueCode::East),
            declared("abe", TicketCounts::new(0, 1, 0, 1), VenueCode::West, VenueCode::West),
        ];
        let (roster, _) = build_roster(&rows, &[]).unwrap();
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["zoe", "abe"]);
    }

    #[test]
    fn duplicate_name_replaces_entry_but_keeps_position() {
        let rows = [
            declared("zoe", TicketCounts::new(1, 0, 1, 0), VenueCode::East, VenueCode::East),
            declared("abe", TicketCounts::new(0, 1, 0, 1), VenueCode::West, VenueCode::West),
            declared("zoe", TicketCounts::new(0, 1, 0, 1), VenueCode::West, VenueCode::West),
        ];
        let (roster, _) = build_roster(&rows, &[]).unwrap();
        assert_eq!(roster.len(), 2);
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["zoe", "abe"]);
        assert_eq!(
            roster.get("zoe").unwrap().wants_at(Day::First),
            Some(Venue::West)
        );
    }

    // --- Delegated cross-checks ---

    #[test]
    fn delegated_mismatch_warns_without_changing_preference() {
        let rows = [declared(
            "bob",
            TicketCounts::new(0, 1, 1, 0),
            VenueCode::West,
            VenueCode::East,
        )];
        let apps = [delegated("frank", "bob", TicketCounts::new(1, 0, 1, 0))];
        let (roster, warnings) = build_roster(&rows, &apps).unwrap();
        assert_eq!(
            warnings,
            vec![PreferenceWarning::DelegatedMismatch {
                applied_by: "frank".to_string(),
                applied_for: "bob".to_string(),
                day: Day::First,
                received: Venue::East,
                wants: Venue::West,
            }]
        );
        assert_eq!(
            roster.get("bob").unwrap().wants_at(Day::First),
            Some(Venue::West)
        );
    }

    #[test]
    fn delegated_day_without_established_preference_is_skipped() {
        let rows = [declared(
            "carol",
            TicketCounts::new(1, 0, 1, 0),
            VenueCode::East,
            VenueCode::NoOpinion,
        )];
        // Day 2 implies west, but carol has no day-2 preference to check.
        let apps = [delegated("erin", "carol", TicketCounts::new(1, 0, 0, 1))];
        let (_, warnings) = build_roster(&rows, &apps).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_beneficiary_is_fatal() {
        let apps = [delegated("erin", "ghost", TicketCounts::new(1, 0, 0, 1))];
        let err = build_roster(&[], &apps).unwrap_err();
        assert_eq!(
            err,
            RosterError::UnknownBeneficiary {
                applied_by: "erin".to_string(),
                applied_for: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn unregistered_applicant_is_allowed() {
        let rows = [declared(
            "alice",
            TicketCounts::new(2, 0, 0, 1),
            VenueCode::East,
            VenueCode::West,
        )];
        let apps = [delegated("erin", "alice", TicketCounts::new(2, 0, 0, 1))];
        let (roster, warnings) = build_roster(&rows, &apps).unwrap();
        assert!(warnings.is_empty());
        assert!(!roster.contains("erin"));
    }
}
