//! Save/load orchestration with an in-flight guard.

use super::{MapStore, StoreError, StoreResult};
use crate::document::MapDocument;
use std::sync::Arc;
use thiserror::Error;

/// Which transfer is currently in flight, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Saving,
    Loading,
}

/// Transfer errors.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("a transfer is already in flight ({0:?})")]
    InFlight(TransferState),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives document saves and loads against a backend, one at a time.
///
/// A second transfer requested while one is pending is rejected instead of
/// raced. Failed transfers leave `current_map_id` unchanged, so the caller
/// can keep editing against the last good id. Cancellation is not
/// supported: dropping a transfer future mid-flight leaves the manager in
/// its in-flight state, because the backend request may still complete.
pub struct TransferManager<S: MapStore> {
    store: Arc<S>,
    state: TransferState,
    current_map_id: Option<String>,
}

impl<S: MapStore> TransferManager<S> {
    /// Create a new transfer manager over the given backend.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: TransferState::Idle,
            current_map_id: None,
        }
    }

    /// Current transfer state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransferState::Idle
    }

    /// The id of the last successfully saved or loaded map.
    pub fn current_map_id(&self) -> Option<&str> {
        self.current_map_id.as_deref()
    }

    /// Save `document` under `name` (empty lets the backend assign an id).
    /// On success the assigned id becomes the current map id.
    pub async fn save(&mut self, name: &str, document: &MapDocument) -> Result<String, TransferError> {
        if self.state != TransferState::Idle {
            return Err(TransferError::InFlight(self.state));
        }
        self.state = TransferState::Saving;
        let result = self.store.save(name, document).await;
        self.state = TransferState::Idle;
        match result {
            Ok(id) => {
                log::info!("map saved as {}", id);
                self.current_map_id = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                log::warn!("map save failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Load the map stored under `id`. On success it becomes the current
    /// map id.
    pub async fn load(&mut self, id: &str) -> Result<MapDocument, TransferError> {
        if self.state != TransferState::Idle {
            return Err(TransferError::InFlight(self.state));
        }
        self.state = TransferState::Loading;
        let result = self.store.load(id).await;
        self.state = TransferState::Idle;
        match result {
            Ok(document) => {
                self.current_map_id = Some(id.to_string());
                Ok(document)
            }
            Err(e) => {
                log::warn!("map load failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Delete a stored map.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(id).await
    }

    /// List all stored ids.
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        self.store.list().await
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::super::{BoxFuture, MemoryStore, block_on};
    use super::*;
    use std::task::Poll;

    fn empty_doc() -> MapDocument {
        MapDocument::from_json("{}").unwrap()
    }

    fn poll_once<F: std::future::Future>(fut: std::pin::Pin<&mut F>) -> Poll<F::Output> {
        use std::task::{Context, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        fut.poll(&mut cx)
    }

    /// A backend whose save/load never complete.
    struct StalledStore;

    impl MapStore for StalledStore {
        fn save(&self, _name: &str, _document: &MapDocument) -> BoxFuture<'_, StoreResult<String>> {
            Box::pin(std::future::pending())
        }

        fn load(&self, _id: &str) -> BoxFuture<'_, StoreResult<MapDocument>> {
            Box::pin(std::future::pending())
        }

        fn delete(&self, _id: &str) -> BoxFuture<'_, StoreResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
            Box::pin(async { Ok(vec![]) })
        }

        fn exists(&self, _id: &str) -> BoxFuture<'_, StoreResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_save_adopts_assigned_id() {
        let mut manager = TransferManager::new(Arc::new(MemoryStore::new()));
        assert!(manager.is_idle());
        assert_eq!(manager.current_map_id(), None);

        let id = block_on(manager.save("", &empty_doc())).unwrap();
        assert_eq!(id, "1");
        assert_eq!(manager.current_map_id(), Some("1"));
        assert!(manager.is_idle());
    }

    #[test]
    fn test_load_success_updates_current_id() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = TransferManager::new(store);
        block_on(manager.save("plan", &empty_doc())).unwrap();

        block_on(manager.load("plan")).unwrap();
        assert_eq!(manager.current_map_id(), Some("plan"));
    }

    #[test]
    fn test_failed_load_keeps_current_id() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = TransferManager::new(store);
        block_on(manager.save("good", &empty_doc())).unwrap();

        let result = block_on(manager.load("missing"));
        assert!(matches!(
            result,
            Err(TransferError::Store(StoreError::NotFound(_)))
        ));
        assert_eq!(manager.current_map_id(), Some("good"));
        assert!(manager.is_idle());
    }

    #[test]
    fn test_in_flight_transfer_rejects_another() {
        let mut manager = TransferManager::new(Arc::new(StalledStore));
        let doc = empty_doc();
        {
            let fut = manager.save("x", &doc);
            let mut fut = std::pin::pin!(fut);
            assert!(poll_once(fut.as_mut()).is_pending());
            // Dropped mid-flight; the backend request is still out there
        }
        assert_eq!(manager.state(), TransferState::Saving);

        let result = block_on(manager.save("y", &doc));
        assert!(matches!(
            result,
            Err(TransferError::InFlight(TransferState::Saving))
        ));
        let result = block_on(manager.load("z"));
        assert!(matches!(result, Err(TransferError::InFlight(_))));
    }
}
