//! tix-alloc
//!
//! Preference and possession engine for the ticket allocation desk.
//!
//! Architectural decisions:
//! - Roster builder turns declared + delegated records into registrants,
//!   collecting data-quality warnings instead of printing them
//! - Pool builder materializes the immutable, densely indexed ticket pool
//! - Possession ledger owns all claim state behind an invariant-checked
//!   claim operation; claims are monotonic for a run
//! - Two-pass greedy allocation: self-held tickets first, then tickets
//!   applied for on a registrant's behalf; no third pass, no backtracking
//!
//! Deterministic, pure logic. No IO.

mod pool;
mod possession;
mod roster;

pub use pool::{build_pool, PoolError};
pub use possession::{
    AllocationOutcome, ClaimEvent, PossessionError, PossessionLedger, TicketFilter,
};
pub use roster::{build_roster, PreferenceWarning, Roster, RosterError};
