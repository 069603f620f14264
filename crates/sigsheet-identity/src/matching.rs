//! First-name matching rule

use crate::Identity;
use sigsheet_roster::{NameList, SlotIndex};

/// First whitespace-separated token of a display name
#[inline]
#[must_use]
pub fn first_name(display_name: &str) -> Option<&str> {
    display_name.split_whitespace().next()
}

/// Resolve a display name to a slot
///
/// Takes the first token of `display_name` and compares it, ignoring case,
/// with each name in list order. The first equal entry wins; [`NameList`]
/// guarantees there is at most one.
#[must_use]
pub fn resolve_slot(display_name: &str, names: &NameList) -> Option<SlotIndex> {
    let wanted = first_name(display_name)?.to_lowercase();
    names
        .iter()
        .find(|(_, name)| name.to_lowercase() == wanted)
        .map(|(index, _)| index)
}

/// Maps a signed-in identity to a roster slot
pub trait IdentityResolver: Send + Sync {
    /// Slot for this identity, or `None` if it is not on the roster
    fn resolve(&self, identity: &Identity) -> Option<SlotIndex>;
}

/// Resolver backed by the fixed name list
#[derive(Debug, Clone)]
pub struct NameListResolver {
    names: NameList,
}

impl NameListResolver {
    /// Create resolver over `names`
    #[inline]
    #[must_use]
    pub fn new(names: NameList) -> Self {
        Self { names }
    }

    /// Underlying names
    #[inline]
    #[must_use]
    pub fn names(&self) -> &NameList {
        &self.names
    }
}

impl IdentityResolver for NameListResolver {
    fn resolve(&self, identity: &Identity) -> Option<SlotIndex> {
        let slot = resolve_slot(&identity.display_name, &self.names);
        tracing::debug!(
            display_name = %identity.display_name,
            email = identity.email.as_deref().unwrap_or("-"),
            slot = ?slot,
            "identity resolved"
        );
        slot
    }
}
