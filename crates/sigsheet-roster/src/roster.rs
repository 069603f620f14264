//! The persisted roster aggregate

use crate::error::RosterError;
use crate::slot::{ImageData, Slot, SlotIndex};

/// Fixed-length ordered collection of slots
///
/// Slot `i` belongs to name `i` of the [`NameList`](crate::NameList). The
/// length never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<Slot>,
}

impl Roster {
    /// Roster of `len` unsigned slots
    #[must_use]
    pub fn empty(len: usize) -> Self {
        Self {
            slots: vec![Slot::unsigned(); len],
        }
    }

    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Number of slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the roster has no slots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at index
    #[inline]
    #[must_use]
    pub fn slot(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index.get())
    }

    /// All slots in order
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterate slots with their index
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotIndex::new(i), s))
    }

    /// Number of signed slots
    #[must_use]
    pub fn signed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_signed()).count()
    }

    /// Check that `index` names an existing, unsigned slot
    ///
    /// # Errors
    /// [`RosterError::SlotOutOfRange`] or [`RosterError::AlreadySigned`]
    pub fn ensure_signable(&self, index: SlotIndex) -> Result<(), RosterError> {
        match self.slot(index) {
            None => Err(RosterError::SlotOutOfRange {
                index,
                len: self.len(),
            }),
            Some(slot) if slot.is_signed() => Err(RosterError::AlreadySigned { index }),
            Some(_) => Ok(()),
        }
    }

    /// Copy of this roster with `image` placed in slot `index`
    pub(crate) fn with_signature(
        &self,
        index: SlotIndex,
        image: ImageData,
    ) -> Result<Self, RosterError> {
        self.ensure_signable(index)?;
        let mut next = self.clone();
        next.slots[index.get()].sign(image);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tag: &str) -> ImageData {
        ImageData::new(format!("data:image/png;base64,{tag}")).unwrap()
    }

    #[test]
    fn empty_roster() {
        let roster = Roster::empty(15);
        assert_eq!(roster.len(), 15);
        assert_eq!(roster.signed_count(), 0);
    }

    #[test]
    fn with_signature_leaves_original_untouched() {
        let roster = Roster::empty(3);
        let next = roster.with_signature(SlotIndex::new(1), image("AA")).unwrap();

        assert_eq!(roster.signed_count(), 0);
        assert_eq!(next.signed_count(), 1);
        assert!(next.slot(SlotIndex::new(1)).unwrap().is_signed());
    }

    #[test]
    fn with_signature_rejects_signed_slot() {
        let roster = Roster::empty(2)
            .with_signature(SlotIndex::new(0), image("AA"))
            .unwrap();

        let err = roster.with_signature(SlotIndex::new(0), image("BB")).unwrap_err();
        assert!(matches!(err, RosterError::AlreadySigned { index } if index == SlotIndex::new(0)));
        assert_eq!(
            roster.slot(SlotIndex::new(0)).unwrap().image(),
            Some(&image("AA"))
        );
    }

    #[test]
    fn with_signature_rejects_out_of_range() {
        let err = Roster::empty(2)
            .with_signature(SlotIndex::new(2), image("AA"))
            .unwrap_err();
        assert!(matches!(err, RosterError::SlotOutOfRange { len: 2, .. }));
    }
}
