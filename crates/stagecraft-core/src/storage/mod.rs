//! Level persistence.
//!
//! Backends store levels as JSON keyed by id. Loading always validates the
//! level, so a corrupt file surfaces as an error instead of reaching the editor.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::level::{Level, LevelError};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Level not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid level: {0}")]
    Invalid(#[from] LevelError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A level storage backend.
pub trait Storage: Send + Sync {
    /// Save a level under `id`.
    fn save(&self, id: &str, level: &Level) -> BoxFuture<'_, StorageResult<()>>;

    /// Load and validate a level.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Level>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All stored level ids, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Parse stored JSON into a validated level.
fn decode_level(json: &str) -> StorageResult<Level> {
    Level::from_json(json).map_err(|e| match e {
        LevelError::Serialization(msg) => StorageError::Serialization(msg),
        other => StorageError::Invalid(other),
    })
}
