//! Possession ledger: all claim state for a run, behind an invariant-checked
//! write surface.
//!
//! # Purpose
//! The pool is immutable; who holds which ticket is not. This module owns
//! that mutable state and exposes exactly one mutation, [`PossessionLedger::claim`],
//! plus the two greedy allocation passes built on it. Claim preconditions are
//! enforced with typed errors because a violation indicates a bug in the
//! allocation algorithm, not bad input.
//!
//! # Determinism
//! The unclaimed id set is a `BTreeSet`, so searches visit candidates in
//! ascending ticket-id order and [`PossessionLedger::find_one`] always
//! returns the lowest-id match. Two ledgers fed the same roster and pool
//! produce identical claim sequences.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tix_model::{Day, Slot, Ticket, TicketId, Venue};

use crate::Roster;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All invariant violations that the claim operation can surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PossessionError {
    /// The claimant has no roster entry.
    UnknownRegistrant { name: String },
    /// The ticket id is outside the pool.
    TicketOutOfRange { ticket_id: TicketId, pool_len: usize },
    /// The ticket is already held.
    AlreadyClaimed { ticket_id: TicketId, holder: String },
    /// The claimant's holdings already list this id. Unreachable while the
    /// holder map is consistent; kept as a second guard.
    DuplicateHolding { ticket_id: TicketId, name: String },
}

impl fmt::Display for PossessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegistrant { name } => {
                write!(f, "possession invariant: unknown registrant '{name}'")
            }
            Self::TicketOutOfRange {
                ticket_id,
                pool_len,
            } => write!(
                f,
                "possession invariant: ticket id {ticket_id} out of range for pool of {pool_len}"
            ),
            Self::AlreadyClaimed { ticket_id, holder } => write!(
                f,
                "possession invariant: ticket {ticket_id} already claimed by '{holder}'"
            ),
            Self::DuplicateHolding { ticket_id, name } => write!(
                f,
                "possession invariant: ticket {ticket_id} already in holdings of '{name}'"
            ),
        }
    }
}

impl std::error::Error for PossessionError {}

// ---------------------------------------------------------------------------
// Search filter
// ---------------------------------------------------------------------------

/// Conjunctive ticket search filter. `None` fields match everything.
#[derive(Clone, Debug, Default)]
pub struct TicketFilter {
    pub applied_by: Option<String>,
    pub applied_for: Option<String>,
    pub day: Option<Day>,
    pub venue: Option<Venue>,
}

impl TicketFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        self.applied_by
            .as_deref()
            .map_or(true, |by| ticket.applied_by == by)
            && self
                .applied_for
                .as_deref()
                .map_or(true, |for_| ticket.applied_for == for_)
            && self.day.map_or(true, |day| ticket.day == day)
            && self.venue.map_or(true, |venue| ticket.venue == venue)
    }
}

// ---------------------------------------------------------------------------
// Claim events
// ---------------------------------------------------------------------------

/// One claim made during an allocation pass, for caller-side logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimEvent {
    pub name: String,
    pub ticket_id: TicketId,
    pub slot: Slot,
}

/// The claims made by both passes of [`PossessionLedger::allocate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub self_claims: Vec<ClaimEvent>,
    pub delegated_claims: Vec<ClaimEvent>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Mutable possession state over an immutable roster and ticket pool.
///
/// Initialized fully unclaimed; claims are monotonic (no release operation
/// exists). At every point the unclaimed set and the union of all holdings
/// lists partition the ticket id space.
#[derive(Clone, Debug)]
pub struct PossessionLedger {
    roster: Roster,
    tickets: Vec<Ticket>,
    unclaimed: BTreeSet<TicketId>,
    holdings: BTreeMap<String, Vec<TicketId>>,
    holder_of: Vec<Option<String>>,
}

impl PossessionLedger {
    pub fn new(roster: &Roster, tickets: Vec<Ticket>) -> Self {
        let unclaimed = (0..tickets.len()).collect();
        let holdings = roster
            .names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        let holder_of = vec![None; tickets.len()];
        Self {
            roster: roster.clone(),
            tickets,
            unclaimed,
            holdings,
            holder_of,
        }
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Claim `ticket_id` for `name`.
    ///
    /// # Errors
    /// Returns [`PossessionError`] if the claimant is unknown, the id is out
    /// of range, or the ticket is already held. The ledger is **not** mutated
    /// on error.
    pub fn claim(&mut self, name: &str, ticket_id: TicketId) -> Result<(), PossessionError> {
        let list = match self.holdings.get_mut(name) {
            Some(list) => list,
            None => {
                return Err(PossessionError::UnknownRegistrant {
                    name: name.to_string(),
                })
            }
        };
        if ticket_id >= self.tickets.len() {
            return Err(PossessionError::TicketOutOfRange {
                ticket_id,
                pool_len: self.tickets.len(),
            });
        }
        if let Some(holder) = self.holder_of[ticket_id].as_ref() {
            return Err(PossessionError::AlreadyClaimed {
                ticket_id,
                holder: holder.clone(),
            });
        }
        if list.contains(&ticket_id) {
            return Err(PossessionError::DuplicateHolding {
                ticket_id,
                name: name.to_string(),
            });
        }

        debug_assert!(self.unclaimed.contains(&ticket_id));
        self.unclaimed.remove(&ticket_id);
        list.push(ticket_id);
        self.holder_of[ticket_id] = Some(name.to_string());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn ticket(&self, ticket_id: TicketId) -> Option<&Ticket> {
        self.tickets.get(ticket_id)
    }

    /// Unclaimed ids in ascending order.
    pub fn unclaimed_ids(&self) -> impl Iterator<Item = TicketId> + '_ {
        self.unclaimed.iter().copied()
    }

    pub fn unclaimed_len(&self) -> usize {
        self.unclaimed.len()
    }

    /// Ids held by `name`, in claim order. Empty for unknown names.
    pub fn holdings(&self, name: &str) -> &[TicketId] {
        self.holdings.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn holder(&self, ticket_id: TicketId) -> Option<&str> {
        self.holder_of.get(ticket_id).and_then(|h| h.as_deref())
    }

    /// First ticket matching `filter`, lowest id first. Searches the
    /// unclaimed set unless `include_claimed` widens it to the whole pool.
    pub fn find_one(&self, filter: &TicketFilter, include_claimed: bool) -> Option<TicketId> {
        if include_claimed {
            (0..self.tickets.len()).find(|&id| filter.matches(&self.tickets[id]))
        } else {
            self.unclaimed
                .iter()
                .copied()
                .find(|&id| filter.matches(&self.tickets[id]))
        }
    }

    /// Whether any ticket held by `name` matches `slot`.
    pub fn has(&self, name: &str, slot: Slot) -> bool {
        self.holdings(name)
            .iter()
            .any(|&id| self.tickets[id].slot() == slot)
    }

    // -----------------------------------------------------------------------
    // Allocation passes
    // -----------------------------------------------------------------------

    /// Pass 1: every registrant claims tickets they applied for themselves.
    ///
    /// For each registrant in roster order, for each desired slot not yet
    /// satisfied, the lowest-id unclaimed ticket with
    /// `applied_by == applied_for == name` and a matching slot is claimed.
    /// Missing tickets are skipped silently; deficits are reported later.
    pub fn take_self(&mut self) -> Result<Vec<ClaimEvent>, PossessionError> {
        self.run_pass(|name| TicketFilter {
            applied_by: Some(name.to_string()),
            applied_for: Some(name.to_string()),
            ..TicketFilter::default()
        })
    }

    /// Pass 2: still-unsatisfied registrants claim tickets applied for on
    /// their behalf, regardless of applicant.
    ///
    /// Must run after [`Self::take_self`]: pass 1 exhausts self-held tickets
    /// first so delegated tickets stay available for registrants who have no
    /// self-held ticket to claim instead.
    pub fn take_for_self(&mut self) -> Result<Vec<ClaimEvent>, PossessionError> {
        self.run_pass(|name| TicketFilter {
            applied_for: Some(name.to_string()),
            ..TicketFilter::default()
        })
    }

    /// Both passes in their required order.
    pub fn allocate(&mut self) -> Result<AllocationOutcome, PossessionError> {
        let self_claims = self.take_self()?;
        let delegated_claims = self.take_for_self()?;
        Ok(AllocationOutcome {
            self_claims,
            delegated_claims,
        })
    }

    fn run_pass<F>(&mut self, base_filter: F) -> Result<Vec<ClaimEvent>, PossessionError>
    where
        F: Fn(&str) -> TicketFilter,
    {
        let mut events = Vec::new();
        // Snapshot names and desired slots up front; claims mutate the ledger
        // while the roster stays fixed for the run.
        let wanted: Vec<(String, Vec<Slot>)> = self
            .roster
            .iter()
            .map(|r| (r.name.clone(), r.desired_slots().collect()))
            .collect();

        for (name, slots) in wanted {
            for slot in slots {
                if self.has(&name, slot) {
                    continue;
                }
                let mut filter = base_filter(&name);
                filter.day = Some(slot.day);
                filter.venue = Some(slot.venue);
                let ticket_id = match self.find_one(&filter, false) {
                    Some(id) => id,
                    None => continue,
                };
                self.claim(&name, ticket_id)?;
                debug_assert!(self.has(&name, slot));
                events.push(ClaimEvent {
                    name: name.clone(),
                    ticket_id,
                    slot,
                });
            }
        }
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
