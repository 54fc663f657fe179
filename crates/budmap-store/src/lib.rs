//! Key-value storage for check-ins.
//!
//! [`KeyValueStore`] is the only contract the vendor service relies on:
//! last-write-wins `put` and `get` by string key. [`MemoryStore`] keeps values
//! for the life of the process; [`FileStore`] persists them as a JSON object.

pub mod error;
pub mod file;
pub mod memory;

use async_trait::async_trait;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Last-write-wins string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read the value under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Storage key for a user's latest check-in at a vendor.
#[must_use]
pub fn checkin_key(vendor_id: &str, user_id: &str) -> String {
    format!("checkin_{vendor_id}_{user_id}")
}
