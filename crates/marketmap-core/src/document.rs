//! The persisted map document: a JSON schema the editor round-trips
//! losslessly (apart from draw order, which is rebuilt on load).
//!
//! Every section tolerates absence. A document written by an older build,
//! or edited by hand, loads with the missing parts empty instead of failing.

use crate::config::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_GRID_SIZE, DEFAULT_PIXELS_PER_UNIT,
    DEFAULT_WALL_THICKNESS, MapConfig,
};
use crate::entity::MarkerKind;
use chrono::{DateTime, Utc};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Current schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Wire representation of a world-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for DocPoint {
    fn from(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

impl From<DocPoint> for Point {
    fn from(point: DocPoint) -> Self {
        Point::new(point.x, point.y)
    }
}

impl From<Vec2> for DocPoint {
    fn from(vec: Vec2) -> Self {
        Self { x: vec.x, y: vec.y }
    }
}

impl From<DocPoint> for Vec2 {
    fn from(point: DocPoint) -> Self {
        Vec2::new(point.x, point.y)
    }
}

/// Wire representation of un-rotated dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocSize {
    pub width: f64,
    pub height: f64,
}

impl From<Size> for DocSize {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl From<DocSize> for Size {
    fn from(size: DocSize) -> Self {
        Size::new(size.width, size.height)
    }
}

/// A complete persisted map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    #[serde(default)]
    pub meta: DocumentMeta,
    #[serde(default)]
    pub layout: DocumentLayout,
    #[serde(default)]
    pub elements: DocumentElements,
}

impl MapDocument {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Identity and provenance of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    /// Storage id the document was last saved under.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Schema version the writer produced.
    pub version: u32,
    /// When the document was serialized.
    pub created_at: DateTime<Utc>,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            version: DOCUMENT_VERSION,
            created_at: Utc::now(),
        }
    }
}

/// Canvas geometry the document was authored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLayout {
    pub width: f64,
    pub height: f64,
    pub grid_size: f64,
    pub wall_thickness: f64,
    pub pixels_per_unit: f64,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            grid_size: DEFAULT_GRID_SIZE,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }
}

impl DocumentLayout {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            grid_size: config.grid_size,
            wall_thickness: config.wall_thickness,
            pixels_per_unit: config.pixels_per_unit,
        }
    }

    /// Adopt this layout into a session config, leaving non-layout settings
    /// (unit, capacity, spawn sizes) alone.
    pub fn apply_to(&self, config: &mut MapConfig) {
        config.canvas_width = self.width;
        config.canvas_height = self.height;
        config.grid_size = self.grid_size;
        config.wall_thickness = self.wall_thickness;
        config.pixels_per_unit = self.pixels_per_unit;
    }
}

/// Everything placed on the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentElements {
    #[serde(default)]
    pub markers: MarkerSlots,
    #[serde(default)]
    pub shelves: Vec<ShelfRecord>,
    #[serde(default)]
    pub loose_products: Vec<ProductRecord>,
    #[serde(default)]
    pub walls: Vec<WallRecord>,
}

/// One optional slot per marker kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<MarkerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<MarkerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<MarkerRecord>,
}

impl MarkerSlots {
    pub fn get(&self, kind: MarkerKind) -> Option<&MarkerRecord> {
        match kind {
            MarkerKind::Entrance => self.entrance.as_ref(),
            MarkerKind::Exit => self.exit.as_ref(),
            MarkerKind::Location => self.current_location.as_ref(),
        }
    }

    pub fn set(&mut self, kind: MarkerKind, record: MarkerRecord) {
        let slot = match kind {
            MarkerKind::Entrance => &mut self.entrance,
            MarkerKind::Exit => &mut self.exit,
            MarkerKind::Location => &mut self.current_location,
        };
        *slot = Some(record);
    }

    /// Present slots with their kinds, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerKind, &MarkerRecord)> {
        MarkerKind::ALL
            .iter()
            .filter_map(|&kind| self.get(kind).map(|record| (kind, record)))
    }
}

/// A stored marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    pub position: DocPoint,
}

/// A stored shelf with its nested product list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfRecord {
    /// Sequential export id ("shelf_1", "shelf_2", ...).
    pub id: String,
    pub position: DocPoint,
    pub dimensions: DocSize,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub products: Vec<AttachedProductRecord>,
}

/// A product nested under its owning shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedProductRecord {
    /// Sequential export id ("product_1", ...). Numbering runs across
    /// attached and loose products in creation order.
    pub id: String,
    pub name: String,
    /// World position at save time. Recomputable from `relative_offset`.
    pub position: DocPoint,
    /// Offset from the shelf center in the shelf's un-rotated frame.
    /// Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_offset: Option<DocPoint>,
}

/// A product not attached to any shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub position: DocPoint,
}

/// A stored wall segment. Only the endpoints are geometric truth; the
/// rounded physical length is carried for consumers that never load the
/// editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRecord {
    pub id: String,
    pub start: DocPoint,
    pub end: DocPoint,
    pub length_in_unit: i64,
}
