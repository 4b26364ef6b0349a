//! Shelf–product attachment rules.
//!
//! Products bind to shelves by id with a local-frame offset, recorded at the
//! moment of attachment. Re-projection through that offset is what keeps a
//! shelf's products rigid under moves and rotations.

use crate::config::DEFAULT_SHELF_CAPACITY;
use crate::entity::{Attachment, EntityId};
use crate::geometry;
use crate::scene::Scene;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Emitted when the shelf–product relation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentEvent {
    Attached { product: EntityId, shelf: EntityId },
    Detached { product: EntityId, shelf: EntityId },
}

/// Policy object that owns every attachment decision.
///
/// Holds no references into the scene; each call receives the scene and
/// resolves ids on the spot, so deleted shelves can never be reached through
/// a stale handle.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentTracker {
    capacity: usize,
}

impl Default for AttachmentTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SHELF_CAPACITY)
    }
}

impl AttachmentTracker {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Per-shelf product cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many products the scene currently has on this shelf.
    pub fn attached_count(&self, scene: &Scene, shelf_id: EntityId) -> usize {
        scene.attached_count(shelf_id)
    }

    /// Re-project every attached product after the shelf moved or rotated.
    ///
    /// Each product's stored local offset is pushed through the shelf's new
    /// frame, and the product is raised above the shelf in the draw order.
    pub fn on_shelf_transformed(&self, scene: &mut Scene, shelf_id: EntityId) {
        let Some(shelf) = scene.shelf(shelf_id) else {
            return;
        };
        let (center, rotation) = (shelf.position, shelf.rotation);
        for product_id in scene.products_attached_to(shelf_id) {
            if let Some(product) = scene.product_mut(product_id) {
                if let Some(attachment) = product.attachment {
                    product.position = geometry::local_to_world(attachment.offset, center, rotation);
                }
            }
            scene.bring_to_front(product_id);
        }
    }

    /// Resolve the relation when an interactive product move ends.
    ///
    /// An attached product that stayed inside its shelf keeps the relation
    /// with a refreshed offset. One that left the shelf bounds is detached
    /// in place; re-attachment (to this or any other shelf) happens on a
    /// later drop via the unattached path.
    pub fn on_product_dropped(&self, scene: &mut Scene, product_id: EntityId) -> Option<AttachmentEvent> {
        let (center, attachment) = match scene.product(product_id) {
            Some(product) => (product.position, product.attachment),
            None => return None,
        };

        let Some(attachment) = attachment else {
            return self.try_attach(scene, product_id, center);
        };

        let frame = scene
            .shelf(attachment.shelf)
            .map(|shelf| (shelf.position, shelf.rotation, shelf.size));
        if let Some((shelf_center, rotation, size)) = frame {
            if geometry::point_in_rotated_rect(center, shelf_center, size, rotation) {
                let offset = geometry::world_to_local(center, shelf_center, rotation);
                if let Some(product) = scene.product_mut(product_id) {
                    product.attachment = Some(Attachment {
                        shelf: attachment.shelf,
                        offset,
                    });
                }
                return None;
            }
        }

        // Left the shelf bounds (or the shelf no longer exists): detach,
        // keeping the product where it was dropped.
        if let Some(product) = scene.product_mut(product_id) {
            product.attachment = None;
        }
        scene.bring_to_front(product_id);
        log::debug!("product {product_id} detached from shelf {}", attachment.shelf);
        Some(AttachmentEvent::Detached {
            product: product_id,
            shelf: attachment.shelf,
        })
    }

    /// Resolve the relation for a product just inserted at `drop_point`.
    pub fn on_product_created(
        &self,
        scene: &mut Scene,
        product_id: EntityId,
        drop_point: Point,
    ) -> Option<AttachmentEvent> {
        self.try_attach(scene, product_id, drop_point)
    }

    /// Clear the relation of every product on `shelf_id`, leaving each at its
    /// current world position. Used when the shelf is deleted.
    pub fn detach_all(&self, scene: &mut Scene, shelf_id: EntityId) -> Vec<AttachmentEvent> {
        let attached = scene.products_attached_to(shelf_id);
        let mut events = Vec::with_capacity(attached.len());
        for product_id in attached {
            if let Some(product) = scene.product_mut(product_id) {
                product.attachment = None;
                events.push(AttachmentEvent::Detached {
                    product: product_id,
                    shelf: shelf_id,
                });
            }
        }
        events
    }

    /// Attach to the first shelf in creation order that contains `point` and
    /// still has room. No eligible shelf means the product stays loose.
    fn try_attach(&self, scene: &mut Scene, product_id: EntityId, point: Point) -> Option<AttachmentEvent> {
        let containing: Vec<(EntityId, Point, f64)> = scene
            .shelves()
            .filter(|shelf| shelf.contains(point))
            .map(|shelf| (shelf.id(), shelf.position, shelf.rotation))
            .collect();
        let (shelf_id, shelf_center, rotation) = containing
            .into_iter()
            .find(|(shelf_id, _, _)| scene.attached_count(*shelf_id) < self.capacity)?;

        let offset = geometry::world_to_local(point, shelf_center, rotation);
        scene.product_mut(product_id)?.attachment = Some(Attachment {
            shelf: shelf_id,
            offset,
        });
        scene.bring_to_front(product_id);
        log::debug!("product {product_id} attached to shelf {shelf_id}");
        Some(AttachmentEvent::Attached {
            product: product_id,
            shelf: shelf_id,
        })
    }
}
