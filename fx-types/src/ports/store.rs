//! Key-value storage port.
//!
//! Each key is independent: writes are last-writer-wins and no cross-key
//! atomicity is required.

use std::sync::Arc;

use serde_json::Value;

use crate::error::StoreError;

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Creates or overwrites the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}
