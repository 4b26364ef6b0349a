//! Entity definitions for the floor plan.

use crate::geometry;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for live entities.
pub type EntityId = Uuid;

/// The singleton marker kinds. At most one of each exists per scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    Entrance,
    Exit,
    /// The shopper's "you are here" marker.
    Location,
}

impl MarkerKind {
    /// All kinds, in display order.
    pub const ALL: [MarkerKind; 3] = [MarkerKind::Entrance, MarkerKind::Exit, MarkerKind::Location];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Entrance => "Entrance",
            MarkerKind::Exit => "Exit",
            MarkerKind::Location => "Location",
        }
    }
}

/// The attachment relation: which shelf owns a product, and where the
/// product sits in that shelf's local (un-rotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Owning shelf.
    pub shelf: EntityId,
    /// Offset from the shelf center, measured before rotation.
    pub offset: Vec2,
}

/// A rotatable shelf. Products reference it by id, never by pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelf {
    pub(crate) id: EntityId,
    /// World-space center.
    pub position: Point,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    /// Un-rotated dimensions.
    pub size: Size,
}

impl Shelf {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            size,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Check whether a world-space point lies within the shelf's rotated
    /// bounds (boundary inclusive).
    pub fn contains(&self, point: Point) -> bool {
        geometry::point_in_rotated_rect(point, self.position, self.size, self.rotation)
    }
}

/// A product. Loose, or attached to exactly one shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub(crate) id: EntityId,
    /// Display name.
    pub label: String,
    /// World-space center.
    pub position: Point,
    /// Present iff the product is attached to a shelf.
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl Product {
    pub fn new(label: String, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            position,
            attachment: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// True if this product is attached to the given shelf.
    pub fn attached_to(&self, shelf: EntityId) -> bool {
        self.attachment.is_some_and(|a| a.shelf == shelf)
    }
}

/// A wall segment. Endpoints are the source of truth; center, length, and
/// angle are derived on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub(crate) id: EntityId,
    pub start: Point,
    pub end: Point,
}

impl Wall {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Length in pixels.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Midpoint between the endpoints.
    pub fn center(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Orientation in degrees, clockwise from screen +x. Zero-length walls
    /// report 0.
    pub fn angle_degrees(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x).to_degrees()
    }
}

/// A singleton marker (entrance, exit, or shopper location).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub(crate) id: EntityId,
    pub kind: MarkerKind,
    /// World-space center.
    pub position: Point,
}

impl Marker {
    pub fn new(kind: MarkerKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// Enum wrapper for everything that lives in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Shelf(Shelf),
    Product(Product),
    Wall(Wall),
    Marker(Marker),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Shelf(e) => e.id,
            Entity::Product(e) => e.id,
            Entity::Wall(e) => e.id,
            Entity::Marker(e) => e.id,
        }
    }

    /// World-space center (for walls, the segment midpoint).
    pub fn position(&self) -> Point {
        match self {
            Entity::Shelf(e) => e.position,
            Entity::Product(e) => e.position,
            Entity::Wall(e) => e.center(),
            Entity::Marker(e) => e.position,
        }
    }

    /// Move the entity so its center lands on `position`. Walls translate
    /// both endpoints, preserving length and angle.
    pub fn set_position(&mut self, position: Point) {
        match self {
            Entity::Shelf(e) => e.position = position,
            Entity::Product(e) => e.position = position,
            Entity::Wall(e) => {
                let delta = position - e.center();
                e.start += delta;
                e.end += delta;
            }
            Entity::Marker(e) => e.position = position,
        }
    }

    pub fn as_shelf(&self) -> Option<&Shelf> {
        match self {
            Entity::Shelf(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_shelf_mut(&mut self) -> Option<&mut Shelf> {
        match self {
            Entity::Shelf(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Entity::Product(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_product_mut(&mut self) -> Option<&mut Product> {
        match self {
            Entity::Product(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Entity::Wall(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_wall_mut(&mut self) -> Option<&mut Wall> {
        match self {
            Entity::Wall(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Entity::Marker(e) => Some(e),
            _ => None,
        }
    }
}
