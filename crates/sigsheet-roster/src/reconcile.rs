//! Derived roster status
//!
//! Pure functions over a snapshot; nothing here mutates or persists.

use crate::roster::Roster;
use serde::Serialize;

/// True iff every slot is signed
#[must_use]
pub fn is_complete(roster: &Roster) -> bool {
    roster.slots().iter().all(|s| s.is_signed())
}

/// True iff at least one slot is signed (export precondition)
#[must_use]
pub fn has_any_signature(roster: &Roster) -> bool {
    roster.slots().iter().any(|s| s.is_signed())
}

/// Summary of a roster snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterStatus {
    /// Signed slots
    pub signed: usize,
    /// Total slots
    pub total: usize,
    /// Every slot signed
    pub complete: bool,
}

/// Compute the status of a snapshot
#[must_use]
pub fn status(roster: &Roster) -> RosterStatus {
    RosterStatus {
        signed: roster.signed_count(),
        total: roster.len(),
        complete: is_complete(roster),
    }
}
