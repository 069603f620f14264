//! Sigsheet Identity
//!
//! Maps an externally authenticated display name to a roster slot.
//!
//! The rule trusts the display name completely: it is a convenience for
//! routing an upload to the right row, not an authorization check.
//!
//! # Example
//!
//! ```rust,ignore
//! use sigsheet_identity::resolve_slot;
//! use sigsheet_roster::{NameList, SlotIndex};
//!
//! let names = NameList::new(["Ahsan", "Nasa"])?;
//! assert_eq!(resolve_slot("ahsan Rahman", &names), Some(SlotIndex::new(0)));
//! assert_eq!(resolve_slot("Unknown Person", &names), None);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod matching;

pub use matching::{first_name, resolve_slot, IdentityResolver, NameListResolver};

use serde::{Deserialize, Serialize};

/// Result of a successful sign-in with the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Full display name as reported by the provider
    pub display_name: String,
    /// Account email, used only for diagnostics
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    /// Identity with a display name only
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: None,
        }
    }

    /// With account email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
