//! tix-model
//!
//! Core domain types for the two-day, two-venue ticket allocation desk:
//! - Days, venues, and the four (day, venue) slots
//! - Tickets, immutable once built, with their display labels
//! - Registrants and their per-day desired venues
//! - The four-slot count tuple carried by every feed row
//!
//! Pure data. No IO, no time, no allocation policy.

use std::collections::BTreeMap;
use std::fmt;

/// Dense ticket identifier: the ticket's position in the pool sequence.
pub type TicketId = usize;

// ---------------------------------------------------------------------------
// Days, venues, slots
// ---------------------------------------------------------------------------

/// Event day. Two days exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Day {
    First,
    Second,
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::First => "day1",
            Day::Second => "day2",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event venue. Two venues exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Venue {
    East,
    West,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::East => "east",
            Venue::West => "west",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (day, venue) pair. Four slots exist in total.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
    pub day: Day,
    pub venue: Venue,
}

impl Slot {
    pub const fn new(day: Day, venue: Venue) -> Self {
        Self { day, venue }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.venue)
    }
}

/// The four slots in feed column order: east-day1, west-day1, east-day2,
/// west-day2. Pool construction and reporting both iterate in this order.
pub const SLOTS: [Slot; 4] = [
    Slot::new(Day::First, Venue::East),
    Slot::new(Day::First, Venue::West),
    Slot::new(Day::Second, Venue::East),
    Slot::new(Day::Second, Venue::West),
];

// ---------------------------------------------------------------------------
// Ticket counts
// ---------------------------------------------------------------------------

/// Per-slot ticket counts carried by every feed row, in feed column order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketCounts {
    pub east_day1: u32,
    pub west_day1: u32,
    pub east_day2: u32,
    pub west_day2: u32,
}

impl TicketCounts {
    pub fn new(east_day1: u32, west_day1: u32, east_day2: u32, west_day2: u32) -> Self {
        Self {
            east_day1,
            west_day1,
            east_day2,
            west_day2,
        }
    }

    /// Count held for a single slot.
    pub fn for_slot(&self, slot: Slot) -> u32 {
        match (slot.day, slot.venue) {
            (Day::First, Venue::East) => self.east_day1,
            (Day::First, Venue::West) => self.west_day1,
            (Day::Second, Venue::East) => self.east_day2,
            (Day::Second, Venue::West) => self.west_day2,
        }
    }

    /// (east, west) counts for one day.
    pub fn day_pair(&self, day: Day) -> (u32, u32) {
        match day {
            Day::First => (self.east_day1, self.west_day1),
            Day::Second => (self.east_day2, self.west_day2),
        }
    }

    pub fn total(&self) -> u32 {
        self.east_day1 + self.west_day1 + self.east_day2 + self.west_day2
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// One issued ticket for a slot. `applied_by` is the registrant who applied
/// for it; `applied_for` the registrant it is intended for. The two differ
/// when one person applies on behalf of another.
///
/// Immutable once built. Possession is tracked separately in the possession
/// ledger, never on the ticket itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub applied_by: String,
    pub applied_for: String,
    pub day: Day,
    pub venue: Venue,
}

impl Ticket {
    pub fn new(
        applied_by: impl Into<String>,
        applied_for: impl Into<String>,
        day: Day,
        venue: Venue,
    ) -> Self {
        Self {
            applied_by: applied_by.into(),
            applied_for: applied_for.into(),
            day,
            venue,
        }
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.day, self.venue)
    }

    pub fn is_self_applied(&self) -> bool {
        self.applied_by == self.applied_for
    }

    /// Full human-readable label: `day1 east [a -> b]`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.slot(), self)
    }
}

/// `[applicant]` when self-applied, `[applicant -> beneficiary]` otherwise.
impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_applied() {
            write!(f, "[{}]", self.applied_by)
        } else {
            write!(f, "[{} -> {}]", self.applied_by, self.applied_for)
        }
    }
}

// ---------------------------------------------------------------------------
// Registrant
// ---------------------------------------------------------------------------

/// A registrant and the venue they want per day. At most one venue per day;
/// an absent day means no opinion (no desired slot that day).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registrant {
    pub name: String,
    pub wants: BTreeMap<Day, Venue>,
}

impl Registrant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wants: BTreeMap::new(),
        }
    }

    pub fn wants_at(&self, day: Day) -> Option<Venue> {
        self.wants.get(&day).copied()
    }

    /// Desired slots in day order.
    pub fn desired_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.wants.iter().map(|(&day, &venue)| Slot::new(day, venue))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
