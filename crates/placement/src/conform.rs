//! Surface conformer: bridges a candidate object pose to the actual surface.
//!
//! Two independent operations, both driven by [`ConformSettings`]: an
//! embedding offset that pushes an object along a direction until its most
//! protruding footprint vertex clears the surface, and a conforming rotation
//! that aligns the object against the hit normal. Rotation is always
//! finalized first; embedding probes the footprint as transformed by the
//! final rotation.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::constants::DEGENERATE_LENGTH;
use crate::math::look_rotation;
use crate::probe::{ProbeFilter, Ray, SurfaceProbe};
use crate::settings::ConformSettings;

/// Offset along `direction` that brings the object's most protruding
/// footprint vertex onto the surface.
///
/// One probe per transformed vertex; the result is the maximum hit distance
/// among them, so no vertex ends up poking through. Zero when nothing hits.
pub fn embed_offset(
    footprint_vertices: &[Vec3],
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    direction: Vec3,
    max_distance: f32,
    probe: &dyn SurfaceProbe,
    filter: &ProbeFilter,
) -> f32 {
    let direction = direction.normalize_or_zero();
    if direction.length_squared() < DEGENERATE_LENGTH {
        return 0.0;
    }

    let mut offset = 0.0_f32;
    for &vertex in footprint_vertices {
        let world = position + rotation * (vertex * scale);
        let ray = Ray::new(world, direction);
        if let Some(hit) = probe.raycast(ray, max_distance, filter) {
            offset = offset.max(hit.distance);
        }
    }
    offset
}

/// Rotation delta aligning an object against `hit_normal`.
///
/// `forward_hint` is the stroke's suggested facing (path tangent, grid axis);
/// it seeds the look direction so conformed objects keep following the
/// stroke.
pub fn conform_rotation(hit_normal: Vec3, forward_hint: Vec3, settings: &ConformSettings) -> Quat {
    if settings.always_orient_up {
        let flattened = Vec3::new(forward_hint.x, 0.0, forward_hint.z);
        if flattened.length() < DEGENERATE_LENGTH {
            // Forward points straight along world up; any yaw is as good as
            // another, but a look-rotation here would collapse.
            debug!("conform_rotation: degenerate flattened forward, using 90 degree fallback");
            return Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        }
        return look_rotation(flattened.normalize(), Vec3::Y).unwrap_or(Quat::IDENTITY);
    }

    if settings.rotate_to_surface {
        let mut tangent = hit_normal.cross(Vec3::NEG_X);
        if tangent.length() < DEGENERATE_LENGTH {
            tangent = hit_normal.cross(Vec3::NEG_Z);
        }
        return look_rotation(tangent.normalize_or_zero(), hit_normal).unwrap_or(Quat::IDENTITY);
    }

    Quat::IDENTITY
}
