//! File-based storage implementation.

use super::{BoxFuture, MapStore, StoreError, StoreResult};
use crate::document::MapDocument;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// File-based map store.
///
/// Stores one JSON file per map in a base directory. The unnamed-save
/// counter is seeded past the highest numeric id already on disk, so
/// restarting the editor never reuses an id.
pub struct FileStore {
    base_path: PathBuf,
    next_default: AtomicU64,
}

impl FileStore {
    /// Create a file store over the given base directory, creating it if
    /// needed.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("Failed to create storage directory: {}", e)))?;
        }
        let next_default = AtomicU64::new(highest_numeric_id(&base_path) + 1);
        Ok(Self {
            base_path,
            next_default,
        })
    }

    /// Create a file store in the default location
    /// (`<data dir>/marketmap/maps/`).
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("marketmap").join("maps"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Get the file path for a stored id.
    fn map_path(&self, id: &str) -> PathBuf {
        // Sanitize the id to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }
}

/// Highest purely numeric file stem under `base`, or 0.
fn highest_numeric_id(base: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(base) else {
        return 0;
    };
    entries
        .flatten()
        .filter(|entry| entry.path().extension().map(|e| e == "json").unwrap_or(false))
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0)
}

impl MapStore for FileStore {
    fn save(&self, name: &str, document: &MapDocument) -> BoxFuture<'_, StoreResult<String>> {
        let name = name.trim().to_string();
        let json = match document.to_json() {
            Ok(json) => json,
            Err(e) => {
                return Box::pin(async move { Err(StoreError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            let id = if name.is_empty() {
                self.next_default.fetch_add(1, Ordering::Relaxed).to_string()
            } else {
                name
            };
            let path = self.map_path(&id);
            fs::write(&path, json)
                .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<MapDocument>> {
        let path = self.map_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id_owned));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
            MapDocument::from_json(&json).map_err(|e| {
                StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.map_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(stem.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.map_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;
    use tempfile::tempdir;

    fn empty_doc() -> MapDocument {
        MapDocument::from_json("{}").unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let mut doc = empty_doc();
        doc.meta.name = "Aisle Layout".to_string();

        let id = block_on(store.save("aisle", &doc)).unwrap();
        assert_eq!(id, "aisle");

        let loaded = block_on(store.load("aisle")).unwrap();
        assert_eq!(loaded.meta.name, "Aisle Layout");
    }

    #[test]
    fn test_unnamed_save_assigns_number() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let doc = empty_doc();
        assert_eq!(block_on(store.save("", &doc)).unwrap(), "1");
        assert_eq!(block_on(store.save("", &doc)).unwrap(), "2");
    }

    #[test]
    fn test_counter_seeds_past_existing_files() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            let doc = empty_doc();
            block_on(store.save("", &doc)).unwrap();
            block_on(store.save("", &doc)).unwrap();
            block_on(store.save("named", &doc)).unwrap();
        }

        // A fresh store over the same directory continues, not restarts
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let doc = empty_doc();
        assert_eq!(block_on(store.save("", &doc)).unwrap(), "3");
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let result = block_on(store.load("nonexistent"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let doc = empty_doc();

        block_on(store.save("doc1", &doc)).unwrap();
        block_on(store.save("doc2", &doc)).unwrap();

        let list = block_on(store.list()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"doc1".to_string()));
        assert!(list.contains(&"doc2".to_string()));

        block_on(store.delete("doc1")).unwrap();
        assert!(!block_on(store.exists("doc1")).unwrap());
        assert!(block_on(store.exists("doc2")).unwrap());
    }

    #[test]
    fn test_sanitizes_id_for_filename() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let doc = empty_doc();

        let id = block_on(store.save("back/room:plan", &doc)).unwrap();
        assert_eq!(id, "back/room:plan");
        // Loadable under the same id even though the filename is sanitized
        assert!(block_on(store.exists("back/room:plan")).unwrap());
        block_on(store.load("back/room:plan")).unwrap();
    }
}
