//! Surface probe boundary.
//!
//! The collision service that answers ray queries lives in the host editor;
//! the core only sees the [`SurfaceProbe`] trait. [`PlaneProbe`] is the
//! in-tree implementation used as the grid-plane fallback and as the test
//! double.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::DEGENERATE_LENGTH;
use crate::types::ObjectId;

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a surface probe query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance along the ray to the hit.
    pub distance: f32,
    /// The collided object, when the surface belongs to one.
    pub object: Option<ObjectId>,
}

/// Query filter for surface probes.
#[derive(Debug, Clone, Default)]
pub struct ProbeFilter {
    /// Bitmask of host scene layers to consider; zero means all layers.
    pub layer_mask: u32,
    /// Whether palette-sourced (already painted) prefabs count as surface.
    pub include_palette_prefabs: bool,
    /// Whether objects without colliders are probed against their bounds.
    pub include_uncollided: bool,
    /// Objects to ignore, e.g. the instance currently being placed.
    pub exceptions: HashSet<ObjectId>,
}

impl ProbeFilter {
    pub fn with_exception(mut self, id: ObjectId) -> Self {
        self.exceptions.insert(id);
        self
    }

    pub fn ignores(&self, id: ObjectId) -> bool {
        self.exceptions.contains(&id)
    }
}

/// Raycasting service provided by the host editor.
pub trait SurfaceProbe {
    /// Closest hit along `ray` within `max_distance`, honoring `filter`.
    fn raycast(&self, ray: Ray, max_distance: f32, filter: &ProbeFilter) -> Option<SurfaceHit>;
}

/// An infinite plane as a probe target.
///
/// Serves as the grid fallback in AUTO paint mode, the shape-plane fallback
/// in ON_SHAPE mode, and the surface double in tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneProbe {
    /// A point on the plane.
    pub origin: Vec3,
    pub normal: Vec3,
}

impl PlaneProbe {
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
        }
    }

    /// The world XZ plane at height zero.
    pub fn ground() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y)
    }
}

impl SurfaceProbe for PlaneProbe {
    fn raycast(&self, ray: Ray, max_distance: f32, _filter: &ProbeFilter) -> Option<SurfaceHit> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < DEGENERATE_LENGTH {
            return None;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: ray.point_at(t),
            normal: self.normal,
            distance: t,
            object: None,
        })
    }
}
