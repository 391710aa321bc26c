use super::super::error::*;

use std::{fmt, sync::*};

/// Common reference type for [Storage].
pub type StorageRef = Arc<dyn Storage>;

//
// Storage
//

/// Durable key-value storage for client-side state.
///
/// Modeled on browser local storage: string keys, string values, one shared namespace. The
/// response cache snapshot and the bearer token live side by side in it.
pub trait Storage
where
    Self: fmt::Debug + Send + Sync,
{
    /// Get an item.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set an item.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an item.
    ///
    /// Removing a missing item is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Remove all items.
    fn clear(&self) -> Result<(), StorageError>;
}
