//! Editor session: the single funnel for scene mutation.

use crate::attachment::{AttachmentEvent, AttachmentTracker};
use crate::codec;
use crate::config::MapConfig;
use crate::document::MapDocument;
use crate::entity::{Entity, EntityId, MarkerKind, Product, Shelf};
use crate::geometry;
use crate::marker::MarkerRegistry;
use crate::scene::Scene;
use crate::wall::{WallBuilder, WallPreview};
use kurbo::Point;

/// An editing session over one map.
///
/// All mutation goes through these entry points, so the attachment and
/// marker bookkeeping can never drift from the scene. Read access is
/// exposed through the borrowed `scene()` and `markers()` views.
pub struct MapEditor {
    config: MapConfig,
    scene: Scene,
    markers: MarkerRegistry,
    tracker: AttachmentTracker,
    wall_builder: WallBuilder,
}

impl MapEditor {
    pub fn new(config: MapConfig) -> Self {
        let tracker = AttachmentTracker::new(config.shelf_capacity);
        let wall_builder = WallBuilder::new(&config);
        Self {
            config,
            scene: Scene::new(),
            markers: MarkerRegistry::new(),
            tracker,
            wall_builder,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Spawn a shelf of the configured default size at the default position.
    pub fn add_shelf(&mut self) -> EntityId {
        let shelf = Shelf::new(self.config.shelf_default_position(), self.config.shelf_size);
        self.scene.add(Entity::Shelf(shelf))
    }

    /// Spawn a product at `at` and resolve attachment against the shelves
    /// under that point.
    pub fn add_product(&mut self, label: &str, at: Point) -> (EntityId, Option<AttachmentEvent>) {
        let product = Product::new(label.to_string(), at);
        let id = self.scene.add(Entity::Product(product));
        let event = self.tracker.on_product_created(&mut self.scene, id, at);
        (id, event)
    }

    /// Spawn the singleton marker of `kind` at its default position.
    /// Returns `None` when that kind is already on the map.
    pub fn add_marker(&mut self, kind: MarkerKind) -> Option<EntityId> {
        self.markers.add(&mut self.scene, kind, &self.config)
    }

    /// Per-frame move handler. Snaps the write to the grid; shelf moves
    /// carry attached products along. Attachment is not re-resolved here,
    /// only at `object_move_end`.
    pub fn object_moving(&mut self, id: EntityId, position: Point) {
        let snapped = geometry::snap_to_grid(position, self.config.grid_size);
        self.scene.set_position(id, snapped);
        if self.scene.shelf(id).is_some() {
            self.tracker.on_shelf_transformed(&mut self.scene, id);
        }
    }

    /// Write a shelf rotation and re-project its attached products.
    pub fn shelf_rotated(&mut self, id: EntityId, degrees: f64) {
        let Some(shelf) = self.scene.shelf_mut(id) else {
            return;
        };
        shelf.rotation = degrees;
        self.tracker.on_shelf_transformed(&mut self.scene, id);
    }

    /// Drop handler. For products this re-resolves attachment at the final
    /// position; other kinds need no drop logic.
    pub fn object_move_end(&mut self, id: EntityId) -> Option<AttachmentEvent> {
        if self.scene.product(id).is_some() {
            self.tracker.on_product_dropped(&mut self.scene, id)
        } else {
            None
        }
    }

    pub fn wall_drag_begin(&mut self, at: Point) {
        self.wall_builder.begin(at);
    }

    pub fn wall_drag_move(&mut self, at: Point) -> Option<WallPreview> {
        self.wall_builder.update(at)
    }

    /// Commit the in-progress wall drag as a wall entity.
    pub fn wall_drag_end(&mut self, at: Point) -> Option<EntityId> {
        let wall = self.wall_builder.end(at)?;
        Some(self.scene.add(Entity::Wall(wall)))
    }

    pub fn wall_drag_cancel(&mut self) {
        self.wall_builder.cancel();
    }

    pub fn is_drawing_wall(&self) -> bool {
        self.wall_builder.is_active()
    }

    /// The live preview of the in-progress wall drag, for the render layer.
    pub fn wall_preview(&self) -> Option<WallPreview> {
        self.wall_builder.preview()
    }

    /// Turn a freehand stroke into an axis-aligned wall entity.
    pub fn stroke_completed(&mut self, points: &[Point]) -> Option<EntityId> {
        let wall = self.wall_builder.from_stroke(points)?;
        Some(self.scene.add(Entity::Wall(wall)))
    }

    /// Per-frame resize handler: rewrite the wall to the new long-axis
    /// extent and hand back the refreshed label.
    pub fn wall_resized(&mut self, id: EntityId, long_axis_extent: f64) -> Option<String> {
        let wall = self.scene.wall_mut(id)?;
        Some(self.wall_builder.resize(wall, long_axis_extent))
    }

    /// The measurement label for a wall, from its current geometry.
    pub fn wall_label(&self, id: EntityId) -> Option<String> {
        let wall = self.scene.wall(id)?;
        Some(self.wall_builder.label_for(wall))
    }

    /// Delete any entity. Deleting a shelf first releases its products,
    /// which stay in the scene at their current positions; deleting a
    /// marker frees its singleton slot.
    pub fn delete_entity(&mut self, id: EntityId) -> Vec<AttachmentEvent> {
        let events = if self.scene.shelf(id).is_some() {
            self.tracker.detach_all(&mut self.scene, id)
        } else {
            Vec::new()
        };
        self.markers.clear_entity(id);
        self.scene.remove(id);
        events
    }

    /// Serialize the current scene. `id` is the storage id, empty for a
    /// map that has not been saved yet.
    pub fn encode_document(&self, id: &str, name: &str) -> MapDocument {
        codec::encode_scene(&self.scene, &self.config, id, name)
    }

    /// Replace the session contents with a loaded document: adopt its
    /// layout, rebuild the scene and the marker registry. Returns the
    /// number of entities installed.
    pub fn install_document(&mut self, document: &MapDocument) -> usize {
        document.layout.apply_to(&mut self.config);
        self.tracker = AttachmentTracker::new(self.config.shelf_capacity);
        self.wall_builder = WallBuilder::new(&self.config);
        self.scene = codec::decode_document(document, &self.config);
        self.markers.rebuild_from_scene(&self.scene);
        self.scene.len()
    }
}

impl Default for MapEditor {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}
