//! Stateless vector and rotation helpers.
//!
//! These are the shared geometric primitives under the stroke generators and
//! the surface conformer: segment intersection with planarity tolerances,
//! tangent-space mapping, signed angles, and axis-aligned bounds.

use glam::{Mat3, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{BOUNDS_TOLERANCE, DEGENERATE_LENGTH, PARALLEL_EPSILON, PLANAR_TOLERANCE};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Bounds enclosing a set of points.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.include_point(p);
        }
        bounds
    }

    /// Bounds of a box centered at `center` with the given half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// The eight corner vertices.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_with_tolerance(point, 0.0)
    }

    /// Containment test with a symmetric slack on every face.
    pub fn contains_with_tolerance(&self, point: Vec3, tolerance: f32) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
            && point.z >= self.min.z - tolerance
            && point.z <= self.max.z + tolerance
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Bounds grown by `padding` on every side.
    pub fn expanded(&self, padding: Vec3) -> Self {
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// World-space bounds of this box under a rotation and translation.
    ///
    /// Conservative: the result encloses the rotated box, it is not the
    /// rotated box itself.
    pub fn transformed(&self, position: Vec3, rotation: Quat) -> Self {
        let abs = Mat3::from_quat(rotation);
        let abs = Mat3::from_cols(abs.x_axis.abs(), abs.y_axis.abs(), abs.z_axis.abs());
        let half = abs * self.half_extents();
        let center = position + rotation * self.center();
        Self::from_center_half_extents(center, half)
    }
}

/// Intersection of two bounded segments, each given as a start point and a
/// full segment vector.
///
/// Returns `None` when the segments are parallel, not coplanar within
/// tolerance, or when the parametric intersection falls outside either
/// segment's axis-aligned extents (checked with a small slack).
pub fn line_line_intersection(p1: Vec3, dir1: Vec3, p2: Vec3, dir2: Vec3) -> Option<Vec3> {
    let cross = dir1.cross(dir2);
    if cross.length_squared() <= PARALLEL_EPSILON {
        return None;
    }

    let offset = p2 - p1;
    let planar_factor = offset.normalize_or_zero().dot(cross.normalize());
    if planar_factor.abs() >= PLANAR_TOLERANCE {
        return None;
    }

    let s = offset.cross(dir2).dot(cross) / cross.length_squared();
    let point = p1 + dir1 * s;

    let seg1 = Aabb::from_points(&[p1, p1 + dir1]);
    let seg2 = Aabb::from_points(&[p2, p2 + dir2]);
    if seg1.contains_with_tolerance(point, BOUNDS_TOLERANCE)
        && seg2.contains_with_tolerance(point, BOUNDS_TOLERANCE)
    {
        Some(point)
    } else {
        None
    }
}

/// Map a 2D plane coordinate into a 3D plane basis.
pub fn tangent_space_to_world(origin: Vec3, tangent: Vec3, bitangent: Vec3, offset: Vec2) -> Vec3 {
    origin + tangent * offset.x + bitangent * offset.y
}

/// Signed angle in radians from `from` to `to` around `axis`.
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = from.angle_between(to);
    if from.cross(to).dot(axis) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// The rotated local axis (one of ±X/±Y/±Z) with the largest projection onto
/// `direction`.
///
/// This picks which local axis of a prefab acts as "up" against an arbitrary
/// surface orientation.
pub fn nearest_axis(rotation: Quat, direction: Vec3) -> Vec3 {
    let mut best = rotation * Vec3::Y;
    let mut best_dot = best.dot(direction);
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        for sign in [1.0, -1.0] {
            let candidate = rotation * (axis * sign);
            let d = candidate.dot(direction);
            if d > best_dot {
                best = candidate;
                best_dot = d;
            }
        }
    }
    best
}

/// Rotation mapping local +Z to `forward` and local +Y toward `up`.
///
/// Returns `None` when `forward` is degenerate or parallel to `up`; callers
/// fall back to a secondary basis (see the conformer).
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.normalize_or_zero();
    if forward.length_squared() < DEGENERATE_LENGTH {
        return None;
    }
    let right = up.cross(forward);
    if right.length() < DEGENERATE_LENGTH {
        return None;
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
}

/// Perpendicular distance from a point to an infinite ray.
pub fn point_ray_distance(point: Vec3, origin: Vec3, direction: Vec3) -> f32 {
    let dir = direction.normalize_or_zero();
    if dir.length_squared() < DEGENERATE_LENGTH {
        return point.distance(origin);
    }
    let offset = point - origin;
    (offset - dir * offset.dot(dir)).length()
}
