//! Shared database row types for the SQL adapters.

use serde_json::Value;
use sqlx::FromRow;

use fx_types::StoreError;

/// Cache row from database. Values are stored as JSON text.
#[derive(FromRow)]
pub struct DbCacheRow {
    pub value: String,
}

impl DbCacheRow {
    pub fn into_value(self) -> Result<Value, StoreError> {
        Ok(serde_json::from_str(&self.value)?)
    }
}

/// Maps a sqlx error into the store error type.
pub fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}
