//! Conversion between the live scene and the persisted document.
//!
//! Export walks creation order and assigns fresh sequential ids, so the
//! file is stable and diffable regardless of how entities were raised or
//! shuffled on screen. Import treats stored relations as claims: every
//! nested product is re-checked against its shelf before the attachment is
//! restored.

use crate::config::MapConfig;
use crate::document::{
    AttachedProductRecord, DocumentElements, DocumentLayout, DocumentMeta, MapDocument,
    MarkerRecord, MarkerSlots, ProductRecord, ShelfRecord, WallRecord, DOCUMENT_VERSION,
};
use crate::entity::{Attachment, Entity, EntityId, Marker, Product, Shelf, Wall};
use crate::geometry;
use crate::scene::Scene;
use crate::wall::length_in_units;
use chrono::Utc;
use kurbo::{Point, Size, Vec2};
use std::collections::HashMap;

/// Serialize the scene into a document saved under `id` with display
/// `name`.
pub fn encode_scene(scene: &Scene, config: &MapConfig, id: &str, name: &str) -> MapDocument {
    // One numbering for all products, attached or loose, in creation order
    let product_ids: HashMap<EntityId, String> = scene
        .products()
        .enumerate()
        .map(|(index, product)| (product.id(), format!("product_{}", index + 1)))
        .collect();

    let mut markers = MarkerSlots::default();
    for marker in scene.markers() {
        if markers.get(marker.kind).is_none() {
            markers.set(
                marker.kind,
                MarkerRecord {
                    position: marker.position.into(),
                },
            );
        }
    }

    let shelves = scene
        .shelves()
        .enumerate()
        .map(|(index, shelf)| {
            let products = scene
                .products_attached_to(shelf.id())
                .into_iter()
                .filter_map(|product_id| {
                    let product = scene.product(product_id)?;
                    let attachment = product.attachment?;
                    Some(AttachedProductRecord {
                        id: product_ids.get(&product_id).cloned().unwrap_or_default(),
                        name: product.label.clone(),
                        position: product.position.into(),
                        relative_offset: Some(attachment.offset.into()),
                    })
                })
                .collect();
            ShelfRecord {
                id: format!("shelf_{}", index + 1),
                position: shelf.position.into(),
                dimensions: shelf.size.into(),
                rotation: shelf.rotation,
                products,
            }
        })
        .collect();

    let loose_products = scene
        .products()
        .filter(|product| !product.is_attached())
        .map(|product| ProductRecord {
            id: product_ids.get(&product.id()).cloned().unwrap_or_default(),
            name: product.label.clone(),
            position: product.position.into(),
        })
        .collect();

    let walls = scene
        .walls()
        .enumerate()
        .map(|(index, wall)| WallRecord {
            id: format!("wall_{}", index + 1),
            start: wall.start.into(),
            end: wall.end.into(),
            length_in_unit: length_in_units(wall.length(), config.pixels_per_unit),
        })
        .collect();

    MapDocument {
        meta: DocumentMeta {
            id: id.to_string(),
            name: name.to_string(),
            version: DOCUMENT_VERSION,
            created_at: Utc::now(),
        },
        layout: DocumentLayout::from_config(config),
        elements: DocumentElements {
            markers,
            shelves,
            loose_products,
            walls,
        },
    }
}

/// Rebuild a live scene from a document.
///
/// Loaded entities are fresh instances with new ids; stored export ids are
/// never reused. A nested product whose offset no longer projects inside
/// its shelf, or that would push the shelf past capacity, loads loose at
/// its world position instead.
pub fn decode_document(document: &MapDocument, config: &MapConfig) -> Scene {
    let mut scene = Scene::new();

    for (kind, record) in document.elements.markers.iter() {
        scene.add(Entity::Marker(Marker::new(kind, record.position.into())));
    }

    for record in &document.elements.shelves {
        let shelf_center: Point = record.position.into();
        let shelf_size: Size = record.dimensions.into();
        let mut shelf = Shelf::new(shelf_center, shelf_size);
        shelf.rotation = record.rotation;
        let shelf_id = scene.add(Entity::Shelf(shelf));

        for nested in &record.products {
            let (position, offset) = resolve_nested(nested, shelf_center, record.rotation);
            let mut product = Product::new(nested.name.clone(), position);

            let inside =
                geometry::point_in_rotated_rect(position, shelf_center, shelf_size, record.rotation);
            let has_room = scene.attached_count(shelf_id) < config.shelf_capacity;
            if inside && has_room {
                product.attachment = Some(Attachment {
                    shelf: shelf_id,
                    offset,
                });
            } else {
                log::warn!(
                    "stored product {:?} no longer fits shelf {:?}; loading it loose",
                    nested.id,
                    record.id
                );
            }
            scene.add(Entity::Product(product));
        }
    }

    for record in &document.elements.loose_products {
        scene.add(Entity::Product(Product::new(
            record.name.clone(),
            record.position.into(),
        )));
    }

    for record in &document.elements.walls {
        scene.add(Entity::Wall(Wall::new(
            record.start.into(),
            record.end.into(),
        )));
    }

    scene
}

/// World position and local offset for a nested record. The stored offset
/// wins when present; otherwise both are re-derived from the stored world
/// position.
fn resolve_nested(
    nested: &AttachedProductRecord,
    shelf_center: Point,
    rotation: f64,
) -> (Point, Vec2) {
    match nested.relative_offset {
        Some(stored) => {
            let offset: Vec2 = stored.into();
            (geometry::local_to_world(offset, shelf_center, rotation), offset)
        }
        None => {
            let position: Point = nested.position.into();
            (position, geometry::world_to_local(position, shelf_center, rotation))
        }
    }
}
