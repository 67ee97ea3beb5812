//! Shared tool machinery: the control-point lifecycle and handle picking.

use glam::Vec3;
use placement::math::point_ray_distance;
use placement::probe::{ProbeFilter, Ray, SurfaceHit, SurfaceProbe};
use placement::spatial::PaintedIndex;
use placement::types::PrefabDescriptor;
use serde::{Deserialize, Serialize};

use crate::input::FrameInput;

/// World-space radius within which a control-point handle grabs the pointer.
pub const HANDLE_PICK_RADIUS: f32 = 0.3;

/// Probe reach for pointer rays.
pub const POINTER_PROBE_DISTANCE: f32 = 10_000.0;

/// Lifecycle of a control-point tool.
///
/// `Idle` waits for the first click to seed the initial point. `Preview`
/// tracks the second control value live under the pointer. `Edit` has the
/// full control-point set established and its handles draggable; Enter
/// commits, Escape walks back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolState {
    #[default]
    Idle,
    Preview,
    Edit,
}

/// Read-only collaborators a tool sees during one frame.
pub struct ToolContext<'a> {
    pub probe: &'a dyn SurfaceProbe,
    pub filter: &'a ProbeFilter,
    pub index: &'a PaintedIndex,
    /// Footprint of the active palette prefab.
    pub descriptor: PrefabDescriptor,
}

impl ToolContext<'_> {
    /// Surface hit under the frame's pointer, if any.
    pub fn pointer_hit(&self, input: &FrameInput) -> Option<SurfaceHit> {
        let pointer = input.pointer?;
        self.probe
            .raycast(pointer.ray, POINTER_PROBE_DISTANCE, self.filter)
    }
}

/// Index of the handle nearest to the pick ray, within the pick radius.
pub fn pick_handle(points: &[Vec3], ray: Ray, pick_radius: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &point) in points.iter().enumerate() {
        let distance = point_ray_distance(point, ray.origin, ray.direction);
        if distance <= pick_radius && best.is_none_or(|(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
