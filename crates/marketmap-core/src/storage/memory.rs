//! In-memory storage implementation.

use super::{BoxFuture, MapStore, StoreError, StoreResult};
use crate::document::MapDocument;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage for testing and ephemeral use.
pub struct MemoryStore {
    maps: RwLock<HashMap<String, MapDocument>>,
    /// Next id handed to an unnamed save.
    next_default: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            maps: RwLock::new(HashMap::new()),
            next_default: AtomicU64::new(1),
        }
    }
}

impl MapStore for MemoryStore {
    fn save(&self, name: &str, document: &MapDocument) -> BoxFuture<'_, StoreResult<String>> {
        let name = name.trim().to_string();
        let document = document.clone();
        Box::pin(async move {
            let id = if name.is_empty() {
                self.next_default.fetch_add(1, Ordering::Relaxed).to_string()
            } else {
                name
            };
            let mut maps = self
                .maps
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            maps.insert(id.clone(), document);
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<MapDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let maps = self
                .maps
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            maps.get(&id).cloned().ok_or_else(|| StoreError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut maps = self
                .maps
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            maps.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let maps = self
                .maps
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(maps.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let maps = self
                .maps
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(maps.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;

    #[test]
    fn test_named_save_uses_name() {
        let store = MemoryStore::new();
        let doc = MapDocument::from_json("{}").unwrap();

        let id = block_on(store.save("store-a", &doc)).unwrap();
        assert_eq!(id, "store-a");

        let loaded = block_on(store.load("store-a")).unwrap();
        assert_eq!(loaded.meta.version, doc.meta.version);
    }

    #[test]
    fn test_unnamed_saves_count_up() {
        let store = MemoryStore::new();
        let doc = MapDocument::from_json("{}").unwrap();

        assert_eq!(block_on(store.save("", &doc)).unwrap(), "1");
        assert_eq!(block_on(store.save("   ", &doc)).unwrap(), "2");
        assert_eq!(block_on(store.save("", &doc)).unwrap(), "3");

        let list = block_on(store.list()).unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_whitespace_name_is_trimmed() {
        let store = MemoryStore::new();
        let doc = MapDocument::from_json("{}").unwrap();
        let id = block_on(store.save("  aisle 4  ", &doc)).unwrap();
        assert_eq!(id, "aisle 4");
    }

    #[test]
    fn test_named_save_overwrites() {
        let store = MemoryStore::new();
        let mut doc = MapDocument::from_json("{}").unwrap();
        doc.meta.name = "first".to_string();
        block_on(store.save("slot", &doc)).unwrap();

        doc.meta.name = "second".to_string();
        block_on(store.save("slot", &doc)).unwrap();

        let loaded = block_on(store.load("slot")).unwrap();
        assert_eq!(loaded.meta.name, "second");
        assert_eq!(block_on(store.list()).unwrap().len(), 1);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.load("nonexistent"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let store = MemoryStore::new();
        let doc = MapDocument::from_json("{}").unwrap();

        assert!(!block_on(store.exists("test")).unwrap());
        block_on(store.save("test", &doc)).unwrap();
        assert!(block_on(store.exists("test")).unwrap());

        block_on(store.delete("test")).unwrap();
        assert!(!block_on(store.exists("test")).unwrap());
        // Deleting again is fine
        block_on(store.delete("test")).unwrap();
    }
}
