//! The storage port: a keyed JSON repository interface.
//!
//! Replaces the source application's ad hoc localStorage reads/writes.
//! Writes are full-object overwrites, with no partial merge, matching
//! the single-user resource model of the original tool.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;

/// A keyed store of JSON documents.
pub trait CachePort {
    /// Fetch the raw JSON document stored under `key`, if any.
    fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Overwrite the document stored under `key`.
    fn set_value(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Typed read: deserialise the document under `key`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        match self.get_value(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Typed write: serialise `value` and overwrite the document under `key`.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        self.set_value(key, serde_json::to_value(value)?)
    }
}
