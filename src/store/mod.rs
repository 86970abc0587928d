//! Storage backends
//!
//! The HTTP layer only talks to [`ContactStore`]. Two implementations exist:
//! - [`MemoryContactStore`]: process-local ordered list, caller-supplied ids
//! - [`SqliteContactStore`]: `contacts` table in an embedded database file

mod contact;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;
use thiserror::Error;

pub use contact::{Contact, ContactFields, CreateContact};
pub use memory::MemoryContactStore;
pub use sqlite::SqliteContactStore;

use crate::config::{StorageBackend, StorageConfig};

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in a contact store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record has this id
    #[error("Contact {0} not found")]
    NotFound(i64),

    /// Payload is structurally valid JSON but not an acceptable contact
    #[error("Invalid contact: {0}")]
    Validation(String),

    /// Operation does not exist for this backend
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Authoritative owner of the contact records.
pub trait ContactStore: Send + Sync {
    /// Short backend name, used in logs and pages.
    fn backend(&self) -> &'static str;

    fn list(&self) -> StoreResult<Vec<Contact>>;

    fn create(&self, payload: CreateContact) -> StoreResult<Contact>;

    fn get(&self, id: i64) -> StoreResult<Contact>;

    /// Replace all three fields of an existing record.
    fn update(&self, id: i64, fields: ContactFields) -> StoreResult<Contact>;

    fn delete(&self, id: i64) -> StoreResult<()>;

    /// Whether `get` and `update` exist for this backend.
    fn supports_lookup(&self) -> bool {
        true
    }

    /// Readiness check.
    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn ContactStore>;

/// Build the configured backend. The SQLite schema is created here,
/// before the listener starts.
pub fn open(config: &StorageConfig) -> StoreResult<SharedStore> {
    match config.backend {
        StorageBackend::Memory => {
            let store = if config.seed_sample_contacts {
                MemoryContactStore::with_sample_contacts()
            } else {
                MemoryContactStore::new()
            };
            Ok(Arc::new(store))
        }
        StorageBackend::Sqlite => Ok(Arc::new(SqliteContactStore::open(&config.database_path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(backend: StorageBackend, seed: bool) -> StorageConfig {
        StorageConfig {
            backend,
            database_path: ":memory:".to_string(),
            seed_sample_contacts: seed,
        }
    }

    #[test]
    fn test_open_memory_seeded() {
        let store = open(&storage_config(StorageBackend::Memory, true)).unwrap();
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_open_memory_empty() {
        let store = open(&storage_config(StorageBackend::Memory, false)).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_open_sqlite_ignores_seed_flag() {
        let store = open(&storage_config(StorageBackend::Sqlite, true)).unwrap();
        assert_eq!(store.backend(), "sqlite");
        assert!(store.list().unwrap().is_empty());
        store.ping().unwrap();
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(StoreError::NotFound(999).to_string(), "Contact 999 not found");
        let err = StoreError::Unsupported {
            operation: "update",
            backend: "memory",
        };
        assert_eq!(err.to_string(), "update is not supported by the memory backend");
    }
}
