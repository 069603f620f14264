//! Named-blob storage
//!
//! A [`StorageBackend`] reads and writes whole string values under a key.
//! Each `set` replaces the value atomically; there is no read-modify-write
//! transaction across calls.

use crate::error::StorageError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Key-value store for persisted snapshots
pub trait StorageBackend: Send + Sync {
    /// Read the value under `key`
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`
    ///
    /// # Errors
    /// Returns error if the write did not take effect
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Identity of one storage handle (one page instance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate new instance ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification that a key was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that changed
    pub key: String,
    /// Handle that wrote it
    pub origin: InstanceId,
}

#[derive(Debug)]
struct Shared {
    entries: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

/// In-memory storage shared between handles
///
/// Every handle created with [`MemoryStorage::handle`] sees the same entries
/// and carries its own [`InstanceId`]. Each `set` broadcasts a
/// [`StorageEvent`] to all subscribers, including the writer; receivers
/// filter their own writes by `origin`.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    origin: InstanceId,
}

impl MemoryStorage {
    /// Create empty storage with one handle
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                events,
            }),
            origin: InstanceId::new(),
        }
    }

    /// New handle onto the same entries with a fresh instance id
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            origin: InstanceId::new(),
        }
    }

    /// Instance id stamped on this handle's writes
    #[inline]
    #[must_use]
    pub fn origin(&self) -> InstanceId {
        self.origin
    }

    /// Subscribe to change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.entries.lock().is_empty()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.shared.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.shared
            .entries
            .lock()
            .insert(key.to_string(), value.to_string());

        // No subscribers is not an error.
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_string(),
            origin: self.origin,
        });
        Ok(())
    }
}
