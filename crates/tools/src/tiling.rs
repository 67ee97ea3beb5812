//! Tiling tool: fills a rectangle with a regular grid of prefabs.
//!
//! First click anchors a corner on the surface; the opposite corner then
//! tracks the pointer on the anchor plane until a second click establishes
//! the nine-point control set (corners, edge midpoints, center). Handle
//! drags resize or move the rectangle, Enter commits.

use glam::Vec3;
use placement::probe::{PlaneProbe, ProbeFilter, SurfaceProbe};
use placement::settings::TilingSettings;
use placement::stroke::tiling::{
    self, CENTER_INDEX, CORNER_COUNT, POINT_COUNT, corners_from_diagonal, derive_points,
};
use placement::types::StrokeSlot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::{HANDLE_PICK_RADIUS, POINTER_PROBE_DISTANCE, ToolContext, ToolState, pick_handle};

/// Persistent control-point data of one tiling stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilingData {
    points: [Vec3; POINT_COUNT],
    normal: Vec3,
    /// Plane basis fixed when the anchor corner was seeded.
    tangent: Vec3,
    bitangent: Vec3,
}

impl Default for TilingData {
    fn default() -> Self {
        Self {
            points: [Vec3::ZERO; POINT_COUNT],
            normal: Vec3::Y,
            tangent: Vec3::X,
            bitangent: Vec3::Z,
        }
    }
}

impl TilingData {
    pub fn points(&self) -> &[Vec3; POINT_COUNT] {
        &self.points
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn corners(&self) -> [Vec3; CORNER_COUNT] {
        [self.points[0], self.points[1], self.points[2], self.points[3]]
    }
}

/// Rectangular grid painting tool.
#[derive(Debug, Default)]
pub struct TilingTool {
    state: ToolState,
    data: TilingData,
    settings: TilingSettings,
    selected_handle: Option<usize>,
    commit_requested: bool,
    revision: u64,
}

impl TilingTool {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn data(&self) -> &TilingData {
        &self.data
    }

    pub fn settings(&self) -> &TilingSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TilingSettings {
        self.revision += 1;
        &mut self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The rectangle's plane, the ON_SHAPE probe fallback.
    pub fn plane(&self) -> PlaneProbe {
        PlaneProbe::new(self.data.points[0], self.data.normal)
    }

    pub fn take_commit_request(&mut self) -> bool {
        std::mem::take(&mut self.commit_requested)
    }

    pub fn reset(&mut self) {
        self.state = ToolState::Idle;
        self.data = TilingData::default();
        self.selected_handle = None;
        self.commit_requested = false;
        self.revision += 1;
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn pointer_on_plane(&self, input: &FrameInput) -> Option<Vec3> {
        let pointer = input.pointer?;
        self.plane()
            .raycast(pointer.ray, POINTER_PROBE_DISTANCE, &ProbeFilter::default())
            .map(|hit| hit.point)
    }

    pub fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        if input.escape {
            if self.state == ToolState::Edit && self.selected_handle.is_some() {
                self.selected_handle = None;
                info!("tiling: handle deselected");
            } else if self.state != ToolState::Idle {
                self.reset();
                info!("tiling: cancelled");
            }
            return;
        }
        if input.enter && self.state == ToolState::Edit {
            self.commit_requested = true;
            return;
        }

        match self.state {
            ToolState::Idle => {
                if input.primary.just_pressed && !input.modifiers.alt {
                    if let Some(hit) = ctx.pointer_hit(input) {
                        let normal = hit.normal;
                        let (tangent, bitangent) = normal.any_orthonormal_pair();
                        self.data = TilingData {
                            points: derive_points(&[hit.point; CORNER_COUNT]),
                            normal,
                            tangent,
                            bitangent,
                        };
                        self.state = ToolState::Preview;
                        self.bump();
                        info!("tiling: anchor corner at {:?}", hit.point);
                    }
                }
            }
            ToolState::Preview => {
                if let Some(opposite) = self.pointer_on_plane(input) {
                    let corners = corners_from_diagonal(
                        self.data.points[0],
                        opposite,
                        self.data.tangent,
                        self.data.bitangent,
                    );
                    let points = derive_points(&corners);
                    if points != self.data.points {
                        self.data.points = points;
                        self.bump();
                    }
                }
                if input.primary.just_pressed && !input.modifiers.alt {
                    self.state = ToolState::Edit;
                    info!("tiling: rectangle established");
                }
            }
            ToolState::Edit => {
                if input.primary.just_pressed {
                    if let Some(pointer) = input.pointer {
                        self.selected_handle =
                            pick_handle(&self.data.points, pointer.ray, HANDLE_PICK_RADIUS);
                    }
                } else if input.primary.pressed {
                    if let (Some(handle), Some(point)) =
                        (self.selected_handle, self.pointer_on_plane(input))
                    {
                        if handle < CORNER_COUNT {
                            tiling::move_corner(&mut self.data.points, handle, point);
                        } else if handle < CENTER_INDEX {
                            tiling::move_midpoint(&mut self.data.points, handle, point);
                        } else {
                            tiling::move_center(&mut self.data.points, point);
                        }
                        self.bump();
                    }
                }
            }
        }
    }

    /// Placement slots, one per grid cell.
    pub fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        if self.state == ToolState::Idle {
            return Vec::new();
        }
        tiling::slots(&self.data.points, &self.settings, ctx.descriptor.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use placement::math::Aabb;
    use placement::probe::Ray;
    use placement::spatial::PaintedIndex;
    use placement::types::{PrefabDescriptor, PrefabId};

    fn test_ctx<'a>(
        probe: &'a PlaneProbe,
        filter: &'a ProbeFilter,
        index: &'a PaintedIndex,
    ) -> ToolContext<'a> {
        ToolContext {
            probe,
            filter,
            index,
            descriptor: PrefabDescriptor::new(
                PrefabId(0),
                Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
            ),
        }
    }

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn test_drag_out_rectangle() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = TilingTool::default();

        tool.handle_input(&FrameInput::click(down_ray(0.0, 0.0)), &ctx);
        assert_eq!(tool.state(), ToolState::Preview);

        tool.handle_input(&FrameInput::hover(down_ray(4.0, 3.0)), &ctx);
        tool.handle_input(&FrameInput::click(down_ray(4.0, 3.0)), &ctx);
        assert_eq!(tool.state(), ToolState::Edit);

        // The rectangle spans the dragged diagonal
        let corners = tool.data().corners();
        let bounds = Aabb::from_points(&corners);
        assert!((bounds.size().x - 4.0).abs() < 1e-4);
        assert!((bounds.size().z - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_grid_cell_count_from_settings() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = TilingTool::default();

        *tool.settings_mut() = TilingSettings {
            cell_size: Vec2::new(1.0, 1.0),
            spacing: Vec2::ZERO,
        };
        tool.handle_input(&FrameInput::click(down_ray(0.0, 0.0)), &ctx);
        tool.handle_input(&FrameInput::hover(down_ray(4.0, 3.0)), &ctx);
        tool.handle_input(&FrameInput::click(down_ray(4.0, 3.0)), &ctx);

        let slots = tool.slots(&ctx);
        assert_eq!(slots.len(), 12);
    }

    #[test]
    fn test_escape_cancels() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = TilingTool::default();

        tool.handle_input(&FrameInput::click(down_ray(0.0, 0.0)), &ctx);
        tool.handle_input(&FrameInput::press_escape(), &ctx);
        assert_eq!(tool.state(), ToolState::Idle);
        assert!(tool.slots(&ctx).is_empty());
    }

    #[test]
    fn test_center_handle_moves_rectangle() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = TilingTool::default();

        tool.handle_input(&FrameInput::click(down_ray(0.0, 0.0)), &ctx);
        tool.handle_input(&FrameInput::hover(down_ray(4.0, 4.0)), &ctx);
        tool.handle_input(&FrameInput::click(down_ray(4.0, 4.0)), &ctx);

        let center = tool.data().points()[CENTER_INDEX];
        // Grab the center handle and drag it
        tool.handle_input(&FrameInput::click(down_ray(center.x, center.z)), &ctx);
        tool.handle_input(&FrameInput::drag(down_ray(center.x + 5.0, center.z)), &ctx);

        let moved = tool.data().points()[CENTER_INDEX];
        assert!((moved - (center + Vec3::new(5.0, 0.0, 0.0))).length() < 1e-4);
    }
}
