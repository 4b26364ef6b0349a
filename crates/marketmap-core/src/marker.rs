//! Singleton markers: entrance, exit, and shopper location.

use crate::config::MapConfig;
use crate::entity::{Entity, EntityId, Marker, MarkerKind};
use crate::scene::Scene;
use std::collections::HashMap;

/// Tracks the at-most-one live marker of each kind.
///
/// The scene owns the marker entities; this registry only maps kinds to ids
/// and gates creation so a second entrance can never appear.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    slots: HashMap<MarkerKind, EntityId>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a marker of `kind` at its configured default position.
    /// Returns `None` without touching the scene when one already exists.
    pub fn add(&mut self, scene: &mut Scene, kind: MarkerKind, config: &MapConfig) -> Option<EntityId> {
        if self.slots.contains_key(&kind) {
            return None;
        }
        let marker = Marker::new(kind, config.marker_default_position(kind));
        let id = scene.add(Entity::Marker(marker));
        self.slots.insert(kind, id);
        Some(id)
    }

    /// The live marker of `kind`, if present.
    pub fn get(&self, kind: MarkerKind) -> Option<EntityId> {
        self.slots.get(&kind).copied()
    }

    pub fn is_present(&self, kind: MarkerKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Remove the marker of `kind` from the scene and free its slot.
    /// Safe to call when absent.
    pub fn remove_kind(&mut self, scene: &mut Scene, kind: MarkerKind) -> Option<EntityId> {
        let id = self.slots.remove(&kind)?;
        scene.remove(id);
        Some(id)
    }

    /// Free whichever slot holds `id`. The entity itself is the caller's to
    /// remove; this only re-enables creation of that kind.
    pub fn clear_entity(&mut self, id: EntityId) {
        self.slots.retain(|_, slot| *slot != id);
    }

    /// Re-derive the slots from a freshly loaded scene. If a corrupt scene
    /// carries duplicate kinds, the first in creation order wins.
    pub fn rebuild_from_scene(&mut self, scene: &Scene) {
        self.slots.clear();
        for marker in scene.markers() {
            self.slots.entry(marker.kind).or_insert(marker.id);
        }
    }
}
