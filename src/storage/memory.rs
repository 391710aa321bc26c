use super::{super::error::*, storage::*};

use {parking_lot::*, std::collections::*};

//
// MemoryStorage
//

/// In-process [Storage].
///
/// Contents last as long as the value (and its clones, when shared via
/// [StorageRef](super::StorageRef)).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructor with a quota in bytes (keys plus values).
    ///
    /// Writes that would exceed it fail with [StorageError::QuotaExceeded].
    pub fn with_quota(quota: usize) -> Self {
        Self { items: Default::default(), quota: Some(quota) }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock();

        if let Some(quota) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, value)| existing.len() + value.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        items.insert(key.into(), value.into());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.items.lock().clear();
        Ok(())
    }
}
