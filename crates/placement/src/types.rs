//! Core data types shared by the stroke generators and the transform resolver.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::Aabb;

/// Identifier of a painted object instance in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Identifier of a palette prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabId(pub u32);

/// Identifier of one committed paint gesture (the undo unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(pub u64);

/// Where painted objects may land when the surface probe misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PaintMode {
    /// Fall back to the grid plane when nothing is hit.
    #[default]
    Auto = 0,
    /// Require a real surface hit; drop the slot otherwise.
    OnSurface = 1,
    /// Fall back to the stroke's own plane.
    OnShape = 2,
}

/// One planned object placement within a stroke, prior to transform
/// resolution.
///
/// Produced fresh every frame by a stroke generator and never persisted;
/// only resolved transforms are handed to the persistence sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSlot {
    /// Palette prefab to instantiate.
    pub prefab: PrefabId,
    /// Position along the stroke's tangent frame, before surface projection.
    pub tangent_position: Vec3,
    /// Orientation suggested by the stroke geometry (path tangent, grid axis).
    pub rotation_hint: Quat,
    /// Per-slot scale multiplier.
    pub scale_multiplier: Vec3,
    /// Mirror on local X (2D sprites).
    pub flip_x: bool,
    /// Mirror on local Y (2D sprites).
    pub flip_y: bool,
    /// Stable index within the stroke. Recomputing with unchanged inputs
    /// yields the same index for the same slot, so already-placed object
    /// identities survive control-point edits.
    pub source_index: u32,
}

impl StrokeSlot {
    pub fn new(prefab: PrefabId, tangent_position: Vec3, source_index: u32) -> Self {
        Self {
            prefab,
            tangent_position,
            rotation_hint: Quat::IDENTITY,
            scale_multiplier: Vec3::ONE,
            flip_x: false,
            flip_y: false,
            source_index,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation_hint = rotation;
        self
    }
}

/// Final world transform for one object instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Host scene layer the instance is placed on.
    pub layer: u32,
    /// Parent to attach the instance under, if any.
    pub parent: Option<ObjectId>,
    /// Surface object the instance was conformed to, if the probe hit one.
    pub surface: Option<ObjectId>,
}

/// Palette entry describing a prefab's local-space footprint.
///
/// The footprint corners are what the conformer probes when embedding, and
/// the planar size drives the circle side-count heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrefabDescriptor {
    pub id: PrefabId,
    /// Local-space bounds around the prefab pivot.
    pub footprint: Aabb,
}

impl PrefabDescriptor {
    pub fn new(id: PrefabId, footprint: Aabb) -> Self {
        Self { id, footprint }
    }

    /// Distance from the pivot down to the footprint's lowest extent.
    pub fn pivot_to_bottom(&self) -> f32 {
        -self.footprint.min.y
    }

    /// Largest horizontal extent, used as the item size for perimeter
    /// tessellation and default path spacing.
    pub fn planar_size(&self) -> f32 {
        let size = self.footprint.size();
        size.x.max(size.z)
    }

    /// Radius of the bounding sphere around the footprint center.
    pub fn bounding_radius(&self) -> f32 {
        self.footprint.half_extents().length()
    }
}
