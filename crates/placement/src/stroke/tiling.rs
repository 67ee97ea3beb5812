//! Tiling stroke generator: a rectangle of control points subdivided into a
//! regular grid of cell centers.
//!
//! The control-point set is fixed at nine points: four corners (counter
//! clockwise), four edge midpoints, and the center. Midpoints and center are
//! derived from the corners; handle drags propagate back onto the corners so
//! the rectangle stays a planar rectangle.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::constants::DEGENERATE_LENGTH;
use crate::math::look_rotation;
use crate::settings::TilingSettings;
use crate::types::{PrefabId, StrokeSlot};

/// Number of corner control points.
pub const CORNER_COUNT: usize = 4;
/// Total control points: corners, edge midpoints, center.
pub const POINT_COUNT: usize = 9;
/// Index of the derived center point.
pub const CENTER_INDEX: usize = 8;

/// Index of the midpoint between corner `i` and corner `(i + 1) % 4`.
pub fn midpoint_index(i: usize) -> usize {
    CORNER_COUNT + i
}

/// Rebuild the full nine-point set from four corners.
pub fn derive_points(corners: &[Vec3; CORNER_COUNT]) -> [Vec3; POINT_COUNT] {
    let mut points = [Vec3::ZERO; POINT_COUNT];
    points[..CORNER_COUNT].copy_from_slice(corners);
    for i in 0..CORNER_COUNT {
        points[midpoint_index(i)] = (corners[i] + corners[(i + 1) % CORNER_COUNT]) * 0.5;
    }
    points[CENTER_INDEX] = (corners[0] + corners[1] + corners[2] + corners[3]) * 0.25;
    points
}

/// Rectangle corners from two opposite corners and a plane basis.
pub fn corners_from_diagonal(
    anchor: Vec3,
    opposite: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
) -> [Vec3; CORNER_COUNT] {
    let diagonal = opposite - anchor;
    let along_t = tangent * diagonal.dot(tangent);
    let along_b = bitangent * diagonal.dot(bitangent);
    [anchor, anchor + along_t, anchor + along_t + along_b, anchor + along_b]
}

/// Plane normal implied by the corner winding.
pub fn plane_normal(corners: &[Vec3; CORNER_COUNT]) -> Vec3 {
    let tangent = corners[1] - corners[0];
    let bitangent = corners[3] - corners[0];
    bitangent.cross(tangent).normalize_or_zero()
}

/// Whole cells fitting along one axis: the largest `n` with
/// `n * step <= extent`.
pub fn axis_cell_count(extent: f32, step: f32) -> usize {
    if step <= 0.0 || extent <= 0.0 {
        return 0;
    }
    let mut count = 0usize;
    while ((count + 1) as f32) * step <= extent {
        count += 1;
    }
    count
}

/// Grid cell centers inside the rectangle.
///
/// Cells are walked from corner 0 along the tangent and bitangent edges in
/// steps of cell size plus spacing; a step that would exceed the rectangle's
/// extent stops the walk on that axis.
pub fn cell_centers(corners: &[Vec3; CORNER_COUNT], settings: &TilingSettings) -> Vec<Vec3> {
    let tangent_edge = corners[1] - corners[0];
    let bitangent_edge = corners[3] - corners[0];
    let len_t = tangent_edge.length();
    let len_b = bitangent_edge.length();
    if len_t < DEGENERATE_LENGTH || len_b < DEGENERATE_LENGTH {
        return Vec::new();
    }
    let dir_t = tangent_edge / len_t;
    let dir_b = bitangent_edge / len_b;

    let step_t = settings.cell_size.x + settings.spacing.x;
    let step_b = settings.cell_size.y + settings.spacing.y;
    let count_t = axis_cell_count(len_t, step_t);
    let count_b = axis_cell_count(len_b, step_b);
    if count_t == 0 || count_b == 0 {
        debug!("cell_centers: no whole cell fits ({len_t} x {len_b})");
        return Vec::new();
    }

    let mut centers = Vec::with_capacity(count_t * count_b);
    for j in 0..count_b {
        let offset_b = j as f32 * step_b + settings.cell_size.y * 0.5;
        for i in 0..count_t {
            let offset_t = i as f32 * step_t + settings.cell_size.x * 0.5;
            centers.push(corners[0] + dir_t * offset_t + dir_b * offset_b);
        }
    }
    centers
}

/// Drag a corner handle.
///
/// The dragged corner takes the full delta. Each neighbor takes the delta
/// minus its projection on the shared edge, the opposite corner takes only
/// the out-of-plane component, so the rectangle stays planar while resizing
/// from the dragged corner.
pub fn move_corner(points: &mut [Vec3; POINT_COUNT], corner: usize, new_pos: Vec3) {
    debug_assert!(corner < CORNER_COUNT);
    let delta = new_pos - points[corner];
    let next = (corner + 1) % CORNER_COUNT;
    let prev = (corner + 3) % CORNER_COUNT;
    let opposite = (corner + 2) % CORNER_COUNT;

    let edge_next = (points[next] - points[corner]).normalize_or_zero();
    let edge_prev = (points[prev] - points[corner]).normalize_or_zero();
    let along_next = edge_next * delta.dot(edge_next);
    let along_prev = edge_prev * delta.dot(edge_prev);
    let out_of_plane = delta - along_next - along_prev;

    let mut corners = [points[0], points[1], points[2], points[3]];
    corners[corner] += delta;
    corners[next] += delta - along_next;
    corners[prev] += delta - along_prev;
    corners[opposite] += out_of_plane;
    *points = derive_points(&corners);
}

/// Drag an edge-midpoint handle: translates the whole edge pair by the delta
/// component perpendicular to the edge.
pub fn move_midpoint(points: &mut [Vec3; POINT_COUNT], midpoint: usize, new_pos: Vec3) {
    debug_assert!((CORNER_COUNT..CENTER_INDEX).contains(&midpoint));
    let delta = new_pos - points[midpoint];
    let a = midpoint - CORNER_COUNT;
    let b = (a + 1) % CORNER_COUNT;
    let edge = (points[b] - points[a]).normalize_or_zero();
    let perpendicular = delta - edge * delta.dot(edge);

    let mut corners = [points[0], points[1], points[2], points[3]];
    corners[a] += perpendicular;
    corners[b] += perpendicular;
    *points = derive_points(&corners);
}

/// Drag the center handle: translates the whole rectangle.
pub fn move_center(points: &mut [Vec3; POINT_COUNT], new_pos: Vec3) {
    let delta = new_pos - points[CENTER_INDEX];
    let corners = [
        points[0] + delta,
        points[1] + delta,
        points[2] + delta,
        points[3] + delta,
    ];
    *points = derive_points(&corners);
}

/// Placement slots, one per grid cell, oriented along the grid tangent.
pub fn slots(
    points: &[Vec3; POINT_COUNT],
    settings: &TilingSettings,
    prefab: PrefabId,
) -> Vec<StrokeSlot> {
    let corners = [points[0], points[1], points[2], points[3]];
    let normal = plane_normal(&corners);
    let tangent = (corners[1] - corners[0]).normalize_or_zero();
    let rotation = look_rotation(tangent, normal).unwrap_or(Quat::IDENTITY);
    cell_centers(&corners, settings)
        .into_iter()
        .enumerate()
        .map(|(i, center)| {
            StrokeSlot::new(prefab, center, i as u32).with_rotation(rotation)
        })
        .collect()
}
