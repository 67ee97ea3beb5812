//! Plain settings aggregates consumed by the generators and the resolver.
//!
//! Each tool composes the structs it needs; there is no settings inheritance
//! and nothing here is mutated by the core during resolution.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How a resolved object conforms to the surface under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConformSettings {
    /// Align the object's up axis to the hit normal.
    pub rotate_to_surface: bool,
    /// Keep world-up regardless of normal tilt; the object only yaws.
    pub always_orient_up: bool,
    /// Push the object along the normal until its lowest extent touches the
    /// surface.
    pub embed_in_surface: bool,
    /// Use the pivot-to-bottom distance instead of raycasting the footprint.
    pub embed_at_pivot_height: bool,
    /// Offset added after rotation, in the object's rotated frame.
    pub local_position_offset: Vec3,
    /// Scalar offset along the hit normal.
    pub surface_distance: f32,
    /// Mirror the placed instance on local X.
    pub flip_x: bool,
    /// Mirror the placed instance on local Y.
    pub flip_y: bool,
}

impl Default for ConformSettings {
    fn default() -> Self {
        Self {
            rotate_to_surface: true,
            always_orient_up: false,
            embed_in_surface: false,
            embed_at_pivot_height: false,
            local_position_offset: Vec3::ZERO,
            surface_distance: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// Circle or user polygon perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ShapeKind {
    #[default]
    Circle = 0,
    Polygon = 1,
}

/// Shape tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSettings {
    pub kind: ShapeKind,
    /// Side count for polygons; circles derive theirs from the item size.
    pub sides: u32,
    /// Swept angle in radians; TAU paints the full perimeter.
    pub arc_angle: f32,
    /// Distance between item centers along the perimeter. Non-positive falls
    /// back to the prefab's planar size.
    pub item_spacing: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Circle,
            sides: 5,
            arc_angle: std::f32::consts::TAU,
            item_spacing: 0.0,
        }
    }
}

/// Line tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSettings {
    /// Distance between item centers along the path. Non-positive falls back
    /// to the prefab's planar size.
    pub spacing: f32,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self { spacing: 0.0 }
    }
}

/// Tiling tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilingSettings {
    /// Cell extent along the rectangle's tangent and bitangent axes.
    pub cell_size: Vec2,
    /// Gap between cells along each axis.
    pub spacing: Vec2,
}

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            cell_size: Vec2::ONE,
            spacing: Vec2::ZERO,
        }
    }
}

/// Wall tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSettings {
    /// Length of one wall module along the run.
    pub module_length: f32,
    /// Wall thickness; doubles as the occupied-cell rejection radius.
    pub thickness: f32,
    /// Gap between modules.
    pub spacing: f32,
    /// Rotate every other module half a turn.
    pub alternate_rotation: bool,
    /// Grid step start/end points snap to.
    pub snap_step: f32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            module_length: 1.0,
            thickness: 0.25,
            spacing: 0.0,
            alternate_rotation: false,
            snap_step: 1.0,
        }
    }
}

/// Circle select/erase tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSettings {
    pub radius: f32,
}

impl Default for CircleSettings {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Pin tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinSettings {
    /// Rotation applied per scroll notch, radians.
    pub rotation_step: f32,
}

impl Default for PinSettings {
    fn default() -> Self {
        Self {
            rotation_step: 15.0_f32.to_radians(),
        }
    }
}
