//! Editor configuration: canvas extents, snapping, units, and spawn defaults.

use crate::entity::MarkerKind;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
/// Canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
/// Grid cell size for snapping (matches the visual grid).
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
/// Short-axis thickness of wall rectangles.
pub const DEFAULT_WALL_THICKNESS: f64 = 8.0;
/// Pixel-to-physical-unit ratio (2 px per centimeter).
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 2.0;
/// How many products one shelf can hold.
pub const DEFAULT_SHELF_CAPACITY: usize = 5;
/// Perpendicular distance from a wall's midpoint to its length label.
pub const DEFAULT_WALL_LABEL_OFFSET: f64 = 20.0;

/// Physical unit used for wall length labels and document export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    #[default]
    Centimeters,
    Meters,
    Inches,
}

impl Unit {
    /// Suffix appended to length labels ("150cm").
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Centimeters => "cm",
            Unit::Meters => "m",
            Unit::Inches => "in",
        }
    }
}

/// Canvas and interaction tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Snap increment for interactive moves.
    pub grid_size: f64,
    /// Short-axis size of wall rectangles.
    pub wall_thickness: f64,
    /// How many pixels make one physical unit.
    pub pixels_per_unit: f64,
    /// The physical unit labels are expressed in.
    pub unit: Unit,
    /// Hard cap on products attached to a single shelf.
    pub shelf_capacity: usize,
    /// Dimensions of a freshly created shelf.
    pub shelf_size: Size,
    /// Perpendicular distance from a wall's midpoint to its label.
    pub wall_label_offset: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            grid_size: DEFAULT_GRID_SIZE,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            unit: Unit::default(),
            shelf_capacity: DEFAULT_SHELF_CAPACITY,
            shelf_size: Size::new(200.0, 40.0),
            wall_label_offset: DEFAULT_WALL_LABEL_OFFSET,
        }
    }
}

impl MapConfig {
    /// Where a marker of the given kind spawns by default.
    pub fn marker_default_position(&self, kind: MarkerKind) -> Point {
        match kind {
            MarkerKind::Entrance => Point::new(100.0, 100.0),
            MarkerKind::Exit => Point::new(self.canvas_width - 100.0, 100.0),
            MarkerKind::Location => Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0),
        }
    }

    /// Where a new shelf spawns by default.
    pub fn shelf_default_position(&self) -> Point {
        Point::new(100.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker_positions() {
        let config = MapConfig::default();
        assert_eq!(config.marker_default_position(MarkerKind::Entrance), Point::new(100.0, 100.0));
        assert_eq!(config.marker_default_position(MarkerKind::Exit), Point::new(1100.0, 100.0));
        assert_eq!(config.marker_default_position(MarkerKind::Location), Point::new(600.0, 400.0));
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(Unit::Centimeters.suffix(), "cm");
        assert_eq!(Unit::Meters.suffix(), "m");
        assert_eq!(Unit::Inches.suffix(), "in");
    }
}
