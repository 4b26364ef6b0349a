//! MarketMap Core Library
//!
//! Platform-agnostic data model and spatial logic for the MarketMap retail
//! floor-plan editor: shelves, shelf-attached products, measured walls,
//! singleton markers, and the JSON document codec plus storage backends.

pub mod attachment;
pub mod codec;
pub mod config;
pub mod document;
pub mod editor;
pub mod entity;
pub mod geometry;
pub mod marker;
pub mod scene;
pub mod storage;
pub mod wall;

pub use attachment::{AttachmentEvent, AttachmentTracker};
pub use codec::{decode_document, encode_scene};
pub use config::{MapConfig, Unit};
pub use document::{DocumentMeta, MapDocument};
pub use editor::MapEditor;
pub use entity::{Attachment, Entity, EntityId, Marker, MarkerKind, Product, Shelf, Wall};
pub use geometry::{local_to_world, point_in_rotated_rect, snap_to_grid, world_to_local};
pub use marker::MarkerRegistry;
pub use scene::Scene;
pub use storage::{
    FileStore, MapStore, MemoryStore, StoreError, StoreResult, TransferError, TransferManager,
    TransferState,
};
pub use wall::{WallBuilder, WallPreview};
