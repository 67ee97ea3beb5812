//! Circle tool target gathering.
//!
//! The circle tools (select, erase, replace) do not place anything; they
//! collect the painted objects under a screen-space circle around the
//! pointer. Candidates come from the spatial index, then each is tested by
//! its perpendicular distance to the camera ray so the result matches the
//! circle the designer sees, not a world-space sphere.

use glam::Vec3;

use crate::math::point_ray_distance;
use crate::probe::Ray;
use crate::spatial::PaintedIndex;
use crate::types::ObjectId;

/// Painted objects inside the circle of `radius` around `center`.
///
/// `camera_ray` is the pointer ray through the circle center; an object
/// belongs to the circle when its bounds center is within `radius` of that
/// ray (inflated by the object's own bounding radius). Returns a sorted set,
/// not an ordered placement sequence.
pub fn gather(
    index: &PaintedIndex,
    camera_ray: Ray,
    center: Vec3,
    radius: f32,
) -> Vec<ObjectId> {
    if radius <= 0.0 {
        return Vec::new();
    }
    let mut targets: Vec<ObjectId> = index
        .query_sphere(center, radius)
        .into_iter()
        .filter(|&id| {
            index.bounds_of(id).is_some_and(|bounds| {
                let slack = bounds.half_extents().length();
                point_ray_distance(bounds.center(), camera_ray.origin, camera_ray.direction)
                    <= radius + slack
            })
        })
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}
