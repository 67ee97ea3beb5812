//! Shape stroke generator: circle and polygon perimeters, with optional
//! partial arcs.
//!
//! A shape is anchored by a center, a radius point (which also fixes the
//! rotation phase), and a plane normal. Circles pick their own side count
//! from the item footprint so the polygon approximation error stays below
//! item resolution.

use glam::{Vec2, Vec3};

use crate::constants::{DEGENERATE_LENGTH, MIN_CIRCLE_SIDES, MIN_POLYGON_SIDES};
use crate::math::{line_line_intersection, tangent_space_to_world};
use crate::settings::{ShapeKind, ShapeSettings};
use crate::types::{PrefabId, StrokeSlot};

use super::distribute_along_path;

/// Side count for an auto-tessellated circle.
///
/// `floor(circumference / max_item_size)`, decremented once more when the
/// resulting chord does not exceed the item size, clamped to a minimum of 32.
pub fn circle_side_count(radius: f32, max_item_size: f32) -> u32 {
    let circumference = std::f32::consts::TAU * radius;
    if max_item_size <= 0.0 || circumference <= 0.0 {
        return MIN_CIRCLE_SIDES;
    }
    let mut sides = (circumference / max_item_size).floor() as i64;
    if sides > 0 {
        let side_length = circumference / sides as f32;
        if side_length <= max_item_size {
            sides -= 1;
        }
    }
    sides.max(MIN_CIRCLE_SIDES as i64) as u32
}

/// A point on the perimeter circle at `angle` radians past the radius-point
/// direction.
fn rim_direction(tangent: Vec3, bitangent: Vec3, angle: f32) -> Vec3 {
    tangent * angle.cos() + bitangent * angle.sin()
}

/// Boundary point of an arc at `angle`, found by intersecting the bounding
/// radius with the polygon edge that brackets it.
fn arc_boundary(
    center: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    radius: f32,
    step: f32,
    angle: f32,
    vertex_at: impl Fn(f32) -> Vec3,
) -> Vec3 {
    let index = angle / step;
    let below = index.floor();
    if (index - below).abs() < 1e-5 || (below + 1.0 - index).abs() < 1e-5 {
        // The bounding radius passes through a vertex
        return vertex_at(index.round() * step);
    }
    let before = vertex_at(below * step);
    let after = vertex_at((below + 1.0) * step);
    let radius_dir = rim_direction(tangent, bitangent, angle);
    // Radius segment reaches past the edge; edge runs between the two
    // bracketing vertices
    line_line_intersection(center, radius_dir * radius * 2.0, before, after - before)
        .unwrap_or(center + radius_dir * radius)
}

/// Perimeter vertices of the shape.
///
/// Full shapes return `sides` vertices starting at the radius-point
/// direction. Partial arcs return the entry boundary point, every whole
/// vertex inside the sweep, and the exit boundary point. Degenerate input
/// (zero radius, radius point on the normal axis, too few sides) returns an
/// empty perimeter.
pub fn perimeter(
    center: Vec3,
    radius_point: Vec3,
    normal: Vec3,
    sides: u32,
    arc_angle: f32,
) -> Vec<Vec3> {
    if sides < MIN_POLYGON_SIDES {
        return Vec::new();
    }
    let normal = normal.normalize_or_zero();
    let mut radial = radius_point - center;
    radial -= normal * radial.dot(normal);
    let radius = radial.length();
    if radius < DEGENERATE_LENGTH || normal.length_squared() < DEGENERATE_LENGTH {
        return Vec::new();
    }

    let tangent = radial / radius;
    let bitangent = normal.cross(tangent).normalize();
    let step = std::f32::consts::TAU / sides as f32;
    let vertex_at = |angle: f32| {
        tangent_space_to_world(
            center,
            tangent,
            bitangent,
            Vec2::new(angle.cos(), angle.sin()) * radius,
        )
    };

    let arc = arc_angle.clamp(0.0, std::f32::consts::TAU);
    if arc >= std::f32::consts::TAU - 1e-5 {
        return (0..sides).map(|k| vertex_at(k as f32 * step)).collect();
    }
    if arc < DEGENERATE_LENGTH {
        return Vec::new();
    }

    let mut vertices = Vec::new();
    vertices.push(arc_boundary(
        center, tangent, bitangent, radius, step, 0.0, vertex_at,
    ));
    let mut k = 1;
    while (k as f32) * step < arc - 1e-5 {
        vertices.push(vertex_at(k as f32 * step));
        k += 1;
    }
    vertices.push(arc_boundary(
        center, tangent, bitangent, radius, step, arc, vertex_at,
    ));
    vertices
}

/// Placement slots along the shape perimeter.
pub fn slots(
    center: Vec3,
    radius_point: Vec3,
    normal: Vec3,
    settings: &ShapeSettings,
    item_size: f32,
    prefab: PrefabId,
) -> Vec<StrokeSlot> {
    let radius = (radius_point - center).length();
    let sides = match settings.kind {
        ShapeKind::Circle => circle_side_count(radius, item_size),
        ShapeKind::Polygon => settings.sides.max(MIN_POLYGON_SIDES),
    };

    let full = settings.arc_angle >= std::f32::consts::TAU - 1e-5;
    let mut rim = perimeter(center, radius_point, normal, sides, settings.arc_angle);
    if rim.is_empty() {
        return Vec::new();
    }
    if full {
        // Close the loop for arc-length walking
        rim.push(rim[0]);
    }

    let spacing = if settings.item_spacing > 0.0 {
        settings.item_spacing
    } else {
        item_size
    };
    if spacing < DEGENERATE_LENGTH {
        return Vec::new();
    }
    distribute_along_path(&rim, spacing, full, normal, prefab)
}
