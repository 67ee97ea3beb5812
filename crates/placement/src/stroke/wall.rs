//! Wall stroke generator: a straight run of wall modules between two snapped
//! grid points, skipping cells already occupied by painted objects.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::constants::{DEGENERATE_LENGTH, OVERLAP_TOLERANCE};
use crate::math::look_rotation;
use crate::settings::WallSettings;
use crate::spatial::PaintedIndex;
use crate::types::{PrefabId, StrokeSlot};

use super::tiling::axis_cell_count;

/// Snap a point to the wall grid.
pub fn snap_to_grid(point: Vec3, step: f32) -> Vec3 {
    if step <= 0.0 {
        return point;
    }
    (point / step).round() * step
}

/// Signed unit axis of the run's largest component.
pub fn dominant_axis(run: Vec3) -> Vec3 {
    let abs = run.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(run.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, run.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, run.z.signum())
    }
}

/// Whether a wall cell at `center` is already occupied by a painted object.
///
/// A cell counts as occupied when an indexed object's bounds center lies
/// within the wall thickness of the cell center.
pub fn cell_occupied(index: &PaintedIndex, center: Vec3, thickness: f32) -> bool {
    index.query_sphere(center, thickness).into_iter().any(|id| {
        index
            .bounds_of(id)
            .is_some_and(|bounds| bounds.center().distance(center) <= thickness * OVERLAP_TOLERANCE)
    })
}

/// Placement slots for a wall run.
///
/// One slot per whole module fitting along the dominant snapped axis between
/// `start` and `end`; occupied cells are skipped but keep their index, so the
/// surviving slots stay stable while neighbors appear and disappear.
pub fn slots(
    start: Vec3,
    end: Vec3,
    settings: &WallSettings,
    prefab: PrefabId,
    index: &PaintedIndex,
) -> Vec<StrokeSlot> {
    let run = end - start;
    if run.length() < DEGENERATE_LENGTH {
        return Vec::new();
    }
    let dir = dominant_axis(run);
    let length = run.dot(dir);
    let step = settings.module_length + settings.spacing;
    if step <= 0.0 || settings.module_length <= 0.0 {
        return Vec::new();
    }

    let count = axis_cell_count(length, step);
    let base_rotation = look_rotation(dir, Vec3::Y)
        .or_else(|| look_rotation(dir, Vec3::Z))
        .unwrap_or(Quat::IDENTITY);
    let flipped = Quat::from_axis_angle(Vec3::Y, std::f32::consts::PI) * base_rotation;

    let mut slots = Vec::with_capacity(count);
    for i in 0..count {
        let center = start + dir * (i as f32 * step + settings.module_length * 0.5);
        if cell_occupied(index, center, settings.thickness) {
            debug!("wall: cell {i} occupied, skipping");
            continue;
        }
        let rotation = if settings.alternate_rotation && i % 2 == 1 {
            flipped
        } else {
            base_rotation
        };
        slots.push(StrokeSlot::new(prefab, center, i as u32).with_rotation(rotation));
    }
    slots
}
