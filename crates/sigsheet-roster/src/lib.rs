//! Sigsheet Roster
//!
//! Fixed-size table of signature slots, persisted as a single key-value
//! snapshot.
//!
//! # Core Concepts
//!
//! - [`NameList`]: Fixed, ordered participant names; its length is the roster size
//! - [`Roster`]: Exactly N [`Slot`]s bound by position to the name list
//! - [`RosterStore`]: Owns the canonical roster, persists every mutation
//! - [`StorageBackend`]: Named-blob store ([`MemoryStorage`], [`FileStorage`])
//! - [`reconcile`]: Pure completion status derived from a snapshot
//! - [`RenderModel`]: Read-only view handed to presentation adapters
//!
//! # Example
//!
//! ```rust,ignore
//! use sigsheet_roster::{ImageData, MemoryStorage, NameList, RosterStore, SlotIndex};
//! use std::sync::Arc;
//!
//! let names = NameList::new(["Ahsan", "Nasa"])?;
//! let mut store = RosterStore::new(Arc::new(MemoryStorage::new()), "spreadsheetData", names.len());
//! store.restore()?;
//!
//! store.set_signature(SlotIndex::new(0), ImageData::new("data:image/png;base64,AAAA")?)?;
//! assert!(!sigsheet_roster::reconcile::is_complete(&store.snapshot()));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod codec;
mod error;
mod file_storage;
mod names;
mod roster;
mod slot;
mod storage;
mod store;

pub mod reconcile;
pub mod render;

// Re-exports
pub use codec::{decode_snapshot, encode_snapshot};
pub use error::{RosterError, StorageError};
pub use file_storage::FileStorage;
pub use names::{NameList, NameListError, DEFAULT_NAMES};
pub use reconcile::RosterStatus;
pub use render::{RenderModel, RenderRow, COMPLETE_BANNER};
pub use roster::Roster;
pub use slot::{ImageData, Slot, SlotIndex};
pub use storage::{InstanceId, MemoryStorage, StorageBackend, StorageEvent};
pub use store::{RosterChange, RosterObserver, RosterStore};

/// Key the roster snapshot is persisted under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "spreadsheetData";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn store_roundtrip_through_shared_memory() {
        let storage = MemoryStorage::new();
        let names = NameList::new(["Ahsan", "Nasa"]).unwrap();

        let mut writer = RosterStore::new(Arc::new(storage.handle()), DEFAULT_STORAGE_KEY, names.len());
        writer.restore().unwrap();
        writer
            .set_signature(SlotIndex::new(1), ImageData::new("data:image/png;base64,AA==").unwrap())
            .unwrap();

        let mut reader = RosterStore::new(Arc::new(storage.handle()), DEFAULT_STORAGE_KEY, names.len());
        reader.restore().unwrap();

        assert_eq!(reader.snapshot(), writer.snapshot());

        let model = RenderModel::build(&reader.snapshot(), &names);
        assert_eq!(model.rows[1].label, "Nasa");
        assert!(model.rows[1].image.is_some());
        assert_eq!(model.banner(), None);
    }
}
