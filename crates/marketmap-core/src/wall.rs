//! Wall construction: drag lifecycle, freehand conversion, and length labels.

use crate::config::{MapConfig, Unit};
use crate::entity::Wall;
use kurbo::{Point, Vec2};

/// Convert a pixel length to whole physical units, the way labels and
/// exports report it. Rounding happens only here; endpoints stay float.
pub fn length_in_units(length_px: f64, pixels_per_unit: f64) -> i64 {
    if pixels_per_unit > 0.0 {
        (length_px / pixels_per_unit).round() as i64
    } else {
        0
    }
}

/// State of a wall drag interaction.
#[derive(Debug, Clone, Copy, Default)]
enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Dragging from `start`, currently at `current`.
    Active { start: Point, current: Point },
}

/// Everything the rendering surface needs to draw an in-progress wall:
/// the transient rectangle and its live length label.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPreview {
    /// Center of the wall rectangle.
    pub center: Point,
    /// Long-axis extent in pixels.
    pub length: f64,
    /// Short-axis extent in pixels.
    pub thickness: f64,
    /// Orientation in degrees, clockwise.
    pub angle_degrees: f64,
    /// Formatted length, e.g. "150cm".
    pub label: String,
    /// Where to draw the label (offset perpendicular from the midpoint).
    pub label_position: Point,
    /// Label orientation, matching the wall.
    pub label_angle_degrees: f64,
}

/// Builds walls from two-point drags or freehand strokes.
#[derive(Debug, Clone)]
pub struct WallBuilder {
    thickness: f64,
    pixels_per_unit: f64,
    unit: Unit,
    label_offset: f64,
    state: DragState,
}

impl WallBuilder {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            thickness: config.wall_thickness,
            pixels_per_unit: config.pixels_per_unit,
            unit: config.unit,
            label_offset: config.wall_label_offset,
            state: DragState::Idle,
        }
    }

    /// Begin a wall drag at `start`.
    pub fn begin(&mut self, start: Point) {
        self.state = DragState::Active {
            start,
            current: start,
        };
    }

    /// Move the drag endpoint and return the refreshed preview.
    /// Returns `None` when no drag is in progress.
    pub fn update(&mut self, point: Point) -> Option<WallPreview> {
        match &mut self.state {
            DragState::Active { current, .. } => {
                *current = point;
                self.preview()
            }
            DragState::Idle => None,
        }
    }

    /// Finish the drag and return the wall. `None` when idle. A drag that
    /// never moved produces a zero-length wall; committing it is the
    /// caller's choice.
    pub fn end(&mut self, point: Point) -> Option<Wall> {
        match self.state {
            DragState::Active { start, .. } => {
                self.state = DragState::Idle;
                Some(Wall::new(start, point))
            }
            DragState::Idle => None,
        }
    }

    /// Abort the drag without creating anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active { .. })
    }

    /// Preview of the in-progress drag, if any.
    pub fn preview(&self) -> Option<WallPreview> {
        match self.state {
            DragState::Active { start, current } => Some(self.preview_for(start, current)),
            DragState::Idle => None,
        }
    }

    /// Collapse a freehand stroke into a straight wall across its bounding
    /// box: vertical if the box is taller than wide, horizontal otherwise,
    /// through the box center. Empty strokes yield nothing.
    pub fn from_stroke(&self, points: &[Point]) -> Option<Wall> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in &points[1..] {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        let wall = if max_y - min_y > max_x - min_x {
            Wall::new(Point::new(center_x, min_y), Point::new(center_x, max_y))
        } else {
            Wall::new(Point::new(min_x, center_y), Point::new(max_x, center_y))
        };
        Some(wall)
    }

    /// Set a wall's long-axis extent, keeping its center and angle, and
    /// return the refreshed label. Negative extents clamp to zero.
    pub fn resize(&self, wall: &mut Wall, long_axis_extent: f64) -> String {
        let center = wall.center();
        let theta = wall.angle_degrees().to_radians();
        let half = long_axis_extent.max(0.0) / 2.0;
        let axis = Vec2::new(theta.cos(), theta.sin());
        wall.start = center - half * axis;
        wall.end = center + half * axis;
        self.label_for(wall)
    }

    /// Formatted length label for an existing wall.
    pub fn label_for(&self, wall: &Wall) -> String {
        self.label_for_length(wall.length())
    }

    /// Formatted label for a pixel length, e.g. "150cm".
    pub fn label_for_length(&self, length_px: f64) -> String {
        format!(
            "{}{}",
            length_in_units(length_px, self.pixels_per_unit),
            self.unit.suffix()
        )
    }

    fn preview_for(&self, start: Point, current: Point) -> WallPreview {
        let length = start.distance(current);
        let angle_radians = (current.y - start.y).atan2(current.x - start.x);
        let angle_degrees = angle_radians.to_degrees();
        let center = start.midpoint(current);
        // Label rides beside the wall, offset along the rotated normal
        let label_position = Point::new(
            center.x - self.label_offset * angle_radians.sin(),
            center.y + self.label_offset * angle_radians.cos(),
        );

        WallPreview {
            center,
            length,
            thickness: self.thickness,
            angle_degrees,
            label: self.label_for_length(length),
            label_position,
            label_angle_degrees: angle_degrees,
        }
    }
}
