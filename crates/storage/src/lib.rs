//! Storage Layer
//!
//! Persists pipeline artifacts under short names so a later run can pick up
//! from intermediate results.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] postcard::Error),
    #[error("Invalid artifact name: {0:?}")]
    InvalidName(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

/// A store of named byte blobs
pub trait Store {
    /// Write a blob, replacing any previous one with the same name
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read a blob
    fn get(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Whether a blob exists
    fn contains(&self, name: &str) -> Result<bool, StorageError>;

    /// Names of all stored blobs, sorted
    fn names(&self) -> Result<Vec<String>, StorageError>;

    /// Encode and store a value
    fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        let bytes = postcard::to_allocvec(value)?;
        debug!("Saving {} ({} bytes)", name, bytes.len());
        self.put(name, &bytes)
    }

    /// Load and decode a value
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError>
    where
        Self: Sized,
    {
        let bytes = self.get(name)?;
        debug!("Loading {} ({} bytes)", name, bytes.len());
        Ok(postcard::from_bytes(&bytes)?)
    }
}

/// Reject names that are empty or could escape the store directory
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}
