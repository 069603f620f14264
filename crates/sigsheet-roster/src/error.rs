//! Error types for the roster store
//!
//! Provides error handling for:
//! - Snapshot restore (corrupt or length-mismatched state)
//! - Slot mutation (range and already-signed checks)
//! - Storage backend reads and writes

use crate::slot::SlotIndex;
use std::path::PathBuf;

/// Errors from roster operations
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Persisted snapshot could not be decoded or has the wrong length
    #[error("corrupt roster snapshot: {reason}")]
    CorruptState {
        /// What was wrong with the snapshot
        reason: String,
    },

    /// Slot index outside `0..len`
    #[error("slot {index} out of range for roster of {len} slots")]
    SlotOutOfRange {
        /// Requested slot
        index: SlotIndex,
        /// Roster length
        len: usize,
    },

    /// Target slot already carries a signature
    #[error("slot {index} is already signed")]
    AlreadySigned {
        /// Signed slot
        index: SlotIndex,
    },

    /// Signature payload was empty
    #[error("signature image data is empty")]
    EmptyImage,

    /// Snapshot could not be encoded for persistence
    #[error("failed to encode roster snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Underlying storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RosterError {
    /// Create corrupt state error
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptState {
            reason: reason.into(),
        }
    }

    /// Whether this error is an expected business condition rather than a fault
    #[inline]
    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::AlreadySigned { .. })
    }
}

/// Errors from storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error reading or writing the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a key-value document
    #[error("storage file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
