use thiserror::Error;

use olxwatch_core::RegistryError;

/// Errors from the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        RegistryError::Datastore(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
