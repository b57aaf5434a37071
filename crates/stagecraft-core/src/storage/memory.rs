//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult, decode_level};
use crate::level::Level;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory storage for tests and scratch sessions. Levels are kept as
/// serialized JSON so loads go through the same validation as files.
#[derive(Default)]
pub struct MemoryStorage {
    levels: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, level: &Level) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = level
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()));
        Box::pin(async move {
            let json = json?;
            let mut levels = self.levels.write().map_err(lock_error)?;
            levels.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Level>> {
        let id = id.to_string();
        Box::pin(async move {
            let levels = self.levels.read().map_err(lock_error)?;
            let json = levels.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            decode_level(json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut levels = self.levels.write().map_err(lock_error)?;
            levels.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let levels = self.levels.read().map_err(lock_error)?;
            Ok(levels.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let levels = self.levels.read().map_err(lock_error)?;
            Ok(levels.contains_key(&id))
        })
    }
}
