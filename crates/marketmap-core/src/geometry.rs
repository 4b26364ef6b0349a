//! Rotated-rectangle containment and local/world frame transforms.
//!
//! All rotation here is in degrees, clockwise in screen coordinates
//! (y grows downward). Every component that needs rotation math calls
//! these functions; none of them re-derives the trig inline.

use kurbo::{Point, Size, Vec2};

/// Check whether `point` lies inside (or on the boundary of) a rectangle
/// centered at `center`, with un-rotated dimensions `size`, rotated by
/// `rotation_degrees`.
pub fn point_in_rotated_rect(point: Point, center: Point, size: Size, rotation_degrees: f64) -> bool {
    let local = world_to_local(point, center, rotation_degrees);
    local.x.abs() <= size.width / 2.0 && local.y.abs() <= size.height / 2.0
}

/// Map an offset in a rectangle's local (un-rotated) frame to world space.
pub fn local_to_world(offset: Vec2, center: Point, rotation_degrees: f64) -> Point {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    Point::new(
        center.x + offset.x * cos - offset.y * sin,
        center.y + offset.x * sin + offset.y * cos,
    )
}

/// Map a world-space point into a rectangle's local (un-rotated) frame.
///
/// Inverse of [`local_to_world`]: `world_to_local(local_to_world(v, c, r), c, r) == v`
/// up to floating-point error.
pub fn world_to_local(point: Point, center: Point, rotation_degrees: f64) -> Vec2 {
    let (sin, cos) = (-rotation_degrees).to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Vec2::new(dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}
