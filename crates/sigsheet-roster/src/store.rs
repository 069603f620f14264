//! Roster store
//!
//! Owns the canonical in-memory [`Roster`] and is the only place it is
//! mutated. Each mutation computes the complete next roster, writes it to
//! storage in one `set`, and only then installs it in memory, so a failed
//! write leaves memory and storage as they were.

use crate::codec::{decode_snapshot, encode_snapshot};
use crate::error::RosterError;
use crate::roster::Roster;
use crate::slot::{ImageData, SlotIndex};
use crate::storage::StorageBackend;
use std::fmt;
use std::sync::Arc;

/// What caused a roster change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    /// Roster reloaded from storage (including fallback to empty)
    Restored,
    /// One slot was signed
    Signed(SlotIndex),
    /// All slots were reset
    Cleared,
}

/// Receives the new snapshot after every restore or mutation
pub trait RosterObserver: Send + Sync {
    /// Called synchronously once the new roster is installed
    fn roster_changed(&self, roster: &Roster, change: RosterChange);
}

/// Canonical roster with persistence
pub struct RosterStore {
    storage: Arc<dyn StorageBackend>,
    key: String,
    roster: Roster,
    observers: Vec<Arc<dyn RosterObserver>>,
}

impl RosterStore {
    /// Store of `len` slots persisted under `key`
    ///
    /// Starts empty; call [`restore`](Self::restore) to load persisted state.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, key: impl Into<String>, len: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            roster: Roster::empty(len),
            observers: Vec::new(),
        }
    }

    /// Register an observer
    pub fn observe(&mut self, observer: Arc<dyn RosterObserver>) {
        self.observers.push(observer);
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// Whether the roster has no slots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Load the persisted snapshot
    ///
    /// An absent snapshot yields an empty roster. A corrupt snapshot also
    /// yields an empty roster (observers are notified either way) and the
    /// corruption is returned; the stored blob is left as it is.
    ///
    /// # Errors
    /// [`RosterError::CorruptState`] after falling back, or
    /// [`RosterError::Storage`] if the read failed (roster unchanged)
    pub fn restore(&mut self) -> Result<(), RosterError> {
        let len = self.roster.len();
        let outcome = match self.storage.get(&self.key)? {
            None => {
                tracing::debug!(key = %self.key, "no persisted roster, starting empty");
                self.roster = Roster::empty(len);
                Ok(())
            }
            Some(blob) => match decode_snapshot(&blob, len) {
                Ok(roster) => {
                    tracing::debug!(key = %self.key, signed = roster.signed_count(), "roster restored");
                    self.roster = roster;
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "persisted roster unusable, falling back to empty");
                    self.roster = Roster::empty(len);
                    Err(e)
                }
            },
        };

        self.notify(RosterChange::Restored);
        outcome
    }

    /// Immutable copy of the current roster
    #[must_use]
    pub fn snapshot(&self) -> Roster {
        self.roster.clone()
    }

    /// Borrow the current roster
    #[inline]
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Sign one slot and persist
    ///
    /// # Errors
    /// [`RosterError::SlotOutOfRange`], [`RosterError::AlreadySigned`], or a
    /// persistence failure; in every case nothing changes.
    pub fn set_signature(&mut self, index: SlotIndex, image: ImageData) -> Result<(), RosterError> {
        let next = self.roster.with_signature(index, image)?;
        self.persist(&next)?;
        self.roster = next;

        tracing::info!(key = %self.key, slot = %index, "signature recorded");
        self.notify(RosterChange::Signed(index));
        Ok(())
    }

    /// Reset every slot to unsigned and persist
    ///
    /// # Errors
    /// Returns error only if the write fails; the roster is then unchanged.
    pub fn clear(&mut self) -> Result<(), RosterError> {
        let next = Roster::empty(self.roster.len());
        self.persist(&next)?;
        self.roster = next;

        tracing::info!(key = %self.key, "roster cleared");
        self.notify(RosterChange::Cleared);
        Ok(())
    }

    fn persist(&self, roster: &Roster) -> Result<(), RosterError> {
        let blob = encode_snapshot(roster)?;
        self.storage.set(&self.key, &blob)?;
        Ok(())
    }

    fn notify(&self, change: RosterChange) {
        for observer in &self.observers {
            observer.roster_changed(&self.roster, change);
        }
    }
}

impl fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterStore")
            .field("key", &self.key)
            .field("roster", &self.roster)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
