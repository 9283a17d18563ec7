//! tix-report
//!
//! Reporting over the possession ledger:
//! - per-slot surplus/deficit summary with signed net counts
//! - indented console rendering bracketed by banner lines
//! - the serializable possession dump persisted as the run artifact
//!
//! Reads ledger state only; never mutates it. Valid at any point in a run,
//! which is how the CLI prints an interim report between the two passes.

mod writer;

pub use writer::IndentWriter;

use std::collections::BTreeMap;

use tix_alloc::PossessionLedger;
use tix_model::{Slot, SLOTS};

/// Registrant name to ordered claimed-ticket labels, as persisted in
/// `allocation.json`. Map order is name-sorted; each list is claim-ordered.
pub type AllocationDump = BTreeMap<String, Vec<String>>;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Surplus/deficit picture for a single slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotReport {
    pub slot: Slot,
    /// Labels of unclaimed tickets in this slot, ticket-id order.
    pub surplus: Vec<String>,
    /// Names of registrants desiring this slot and still unsatisfied,
    /// roster order.
    pub deficit: Vec<String>,
    /// `surplus - deficit`; negative when demand exceeds the leftover pool.
    pub net: i64,
}

/// Per-slot reconciliation picture for the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub slots: Vec<SlotReport>,
}

/// Compute the per-slot surplus/deficit summary for the ledger's current
/// state.
pub fn summarize(ledger: &PossessionLedger) -> ReconciliationReport {
    let mut slots = Vec::with_capacity(SLOTS.len());
    for slot in SLOTS {
        let surplus: Vec<String> = ledger
            .unclaimed_ids()
            .filter(|&id| ledger.tickets()[id].slot() == slot)
            .map(|id| ledger.tickets()[id].to_string())
            .collect();

        let deficit: Vec<String> = ledger
            .roster()
            .iter()
            .filter(|r| r.wants_at(slot.day) == Some(slot.venue) && !ledger.has(&r.name, slot))
            .map(|r| r.name.clone())
            .collect();

        let net = surplus.len() as i64 - deficit.len() as i64;
        slots.push(SlotReport {
            slot,
            surplus,
            deficit,
            net,
        });
    }
    ReconciliationReport { slots }
}

impl ReconciliationReport {
    /// Render the console report, bracketed by banner lines carrying `label`.
    /// Empty surplus/deficit lists are omitted.
    pub fn render(&self, label: &str) -> String {
        let mut w = IndentWriter::new();
        w.line(&format!("----- {label} -----"));
        for s in &self.slots {
            w.line(&format!("{}: {}", s.slot, s.net));
            w.indented(|w| {
                if !s.surplus.is_empty() {
                    w.line(&format!("surplus({}): {}", s.surplus.len(), s.surplus.join(", ")));
                }
                if !s.deficit.is_empty() {
                    w.line(&format!("deficit({}): {}", s.deficit.len(), s.deficit.join(", ")));
                }
            });
        }
        w.line(&format!("----- {label} -----"));
        w.into_string()
    }

    /// Total unsatisfied desired slots across all four slots.
    pub fn total_deficit(&self) -> usize {
        self.slots.iter().map(|s| s.deficit.len()).sum()
    }

    /// Total unclaimed tickets across all four slots.
    pub fn total_surplus(&self) -> usize {
        self.slots.iter().map(|s| s.surplus.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Dump
// ---------------------------------------------------------------------------

/// The structured final-allocation view: every registrant mapped to the
/// labels of the tickets they hold, in claim order.
pub fn possession_dump(ledger: &PossessionLedger) -> AllocationDump {
    ledger
        .roster()
        .iter()
        .map(|r| {
            let labels = ledger
                .holdings(&r.name)
                .iter()
                .map(|&id| ledger.tickets()[id].describe())
                .collect();
            (r.name.clone(), labels)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
