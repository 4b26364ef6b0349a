//! Storage abstraction for map persistence.

mod file;
mod memory;
mod transfer;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use transfer::{TransferError, TransferManager, TransferState};

use crate::document::MapDocument;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Map not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for map storage backends.
///
/// `save` takes the user's chosen name and returns the id the document was
/// actually stored under: the trimmed name, or, when the name is empty,
/// the next value of a monotonically increasing per-backend counter. Two
/// unnamed saves never collide.
pub trait MapStore: Send + Sync {
    /// Save a document under `name` (may be empty). Returns the stored id.
    fn save(&self, name: &str, document: &MapDocument) -> BoxFuture<'_, StoreResult<String>>;

    /// Load a document by stored id.
    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<MapDocument>>;

    /// Delete a document. Deleting an absent id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// List all stored ids.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

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
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
