//! The live scene graph: entity arena, draw order, and creation order.

use crate::entity::{Entity, EntityId, Marker, Product, Shelf, Wall};
use kurbo::Point;
use std::collections::HashMap;

/// All live entities of one floor plan.
///
/// Two orders are kept side by side. `z_order` is the draw order (back to
/// front) and moves when entities are raised. `spawn_order` is the creation
/// order and never reorders; attachment resolution and document export walk
/// it so that raising a product never changes which shelf wins a drop.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: HashMap<EntityId, Entity>,
    /// Draw order (back to front).
    z_order: Vec<EntityId>,
    /// Creation order.
    spawn_order: Vec<EntityId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity on top of the draw order. Returns its id.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.z_order.push(id);
        self.spawn_order.push(id);
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity from the scene.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.z_order.retain(|&entity_id| entity_id != id);
        self.spawn_order.retain(|&entity_id| entity_id != id);
        self.entities.remove(&id)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.z_order.clear();
        self.spawn_order.clear();
    }

    /// Get an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Get the shelf with this id, if the id names a shelf.
    pub fn shelf(&self, id: EntityId) -> Option<&Shelf> {
        self.entities.get(&id).and_then(Entity::as_shelf)
    }

    pub fn shelf_mut(&mut self, id: EntityId) -> Option<&mut Shelf> {
        self.entities.get_mut(&id).and_then(Entity::as_shelf_mut)
    }

    /// Get the product with this id, if the id names a product.
    pub fn product(&self, id: EntityId) -> Option<&Product> {
        self.entities.get(&id).and_then(Entity::as_product)
    }

    pub fn product_mut(&mut self, id: EntityId) -> Option<&mut Product> {
        self.entities.get_mut(&id).and_then(Entity::as_product_mut)
    }

    /// Get the wall with this id, if the id names a wall.
    pub fn wall(&self, id: EntityId) -> Option<&Wall> {
        self.entities.get(&id).and_then(Entity::as_wall)
    }

    pub fn wall_mut(&mut self, id: EntityId) -> Option<&mut Wall> {
        self.entities.get_mut(&id).and_then(Entity::as_wall_mut)
    }

    /// Get the marker with this id, if the id names a marker.
    pub fn marker(&self, id: EntityId) -> Option<&Marker> {
        self.entities.get(&id).and_then(Entity::as_marker)
    }

    /// Entities in draw order (back to front).
    pub fn iter_z_order(&self) -> impl Iterator<Item = &Entity> {
        self.z_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Entities in creation order.
    pub fn iter_spawn_order(&self) -> impl Iterator<Item = &Entity> {
        self.spawn_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Shelves in creation order.
    pub fn shelves(&self) -> impl Iterator<Item = &Shelf> {
        self.iter_spawn_order().filter_map(Entity::as_shelf)
    }

    /// Products in creation order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.iter_spawn_order().filter_map(Entity::as_product)
    }

    /// Walls in creation order.
    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.iter_spawn_order().filter_map(Entity::as_wall)
    }

    /// Markers in creation order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.iter_spawn_order().filter_map(Entity::as_marker)
    }

    /// Ids of the products attached to a shelf, in creation order.
    pub fn products_attached_to(&self, shelf_id: EntityId) -> Vec<EntityId> {
        self.products()
            .filter(|product| product.attached_to(shelf_id))
            .map(|product| product.id)
            .collect()
    }

    /// How many products are attached to a shelf.
    pub fn attached_count(&self, shelf_id: EntityId) -> usize {
        self.products()
            .filter(|product| product.attached_to(shelf_id))
            .count()
    }

    /// Move an entity's center to `position`.
    pub fn set_position(&mut self, id: EntityId, position: Point) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.set_position(position);
        }
    }

    /// Bring an entity to the front of the draw order.
    pub fn bring_to_front(&mut self, id: EntityId) {
        if !self.entities.contains_key(&id) {
            return;
        }
        self.z_order.retain(|&entity_id| entity_id != id);
        self.z_order.push(id);
    }

    /// Position of an entity in the draw order (0 = backmost).
    pub fn z_index(&self, id: EntityId) -> Option<usize> {
        self.z_order.iter().position(|&entity_id| entity_id == id)
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use uuid::Uuid;

    fn shelf_at(x: f64, y: f64) -> Entity {
        Entity::Shelf(Shelf::new(Point::new(x, y), Size::new(200.0, 40.0)))
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let id = scene.add(shelf_at(100.0, 100.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.shelf(id).is_some());
        assert!(scene.product(id).is_none());

        let removed = scene.remove(id);
        assert!(removed.is_some());
        assert!(scene.is_empty());
        assert_eq!(scene.z_index(id), None);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut scene = Scene::new();
        scene.add(shelf_at(0.0, 0.0));
        assert!(scene.remove(Uuid::new_v4()).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_bring_to_front_moves_draw_order_only() {
        let mut scene = Scene::new();
        let a = scene.add(shelf_at(0.0, 0.0));
        let b = scene.add(shelf_at(50.0, 0.0));
        let c = scene.add(shelf_at(100.0, 0.0));

        scene.bring_to_front(a);
        assert_eq!(scene.z_index(a), Some(2));
        assert_eq!(scene.z_index(b), Some(0));
        assert_eq!(scene.z_index(c), Some(1));

        // Creation order is untouched
        let spawn: Vec<EntityId> = scene.iter_spawn_order().map(Entity::id).collect();
        assert_eq!(spawn, vec![a, b, c]);
    }

    #[test]
    fn test_attached_queries() {
        let mut scene = Scene::new();
        let shelf = scene.add(shelf_at(100.0, 100.0));
        let p1 = scene.add(Entity::Product(Product::new("A".into(), Point::new(0.0, 0.0))));
        let p2 = scene.add(Entity::Product(Product::new("B".into(), Point::new(0.0, 0.0))));
        scene.add(Entity::Product(Product::new("C".into(), Point::new(0.0, 0.0))));

        use crate::entity::Attachment;
        use kurbo::Vec2;
        for id in [p1, p2] {
            scene.product_mut(id).unwrap().attachment = Some(Attachment {
                shelf,
                offset: Vec2::ZERO,
            });
        }

        assert_eq!(scene.attached_count(shelf), 2);
        assert_eq!(scene.products_attached_to(shelf), vec![p1, p2]);
    }

    #[test]
    fn test_set_position_dispatches() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::Marker(Marker::new(
            crate::entity::MarkerKind::Entrance,
            Point::new(100.0, 100.0),
        )));
        scene.set_position(id, Point::new(240.0, 180.0));
        assert_eq!(scene.marker(id).unwrap().position, Point::new(240.0, 180.0));
    }
}
