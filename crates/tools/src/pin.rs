//! Pin tool: places one prefab under the pointer, oriented against the
//! surface it lands on.
//!
//! Press seeds the placement and previews it; while held, the position
//! follows the pointer and the scroll wheel spins the prefab around the hit
//! normal. Release commits. Whichever prefab local axis projects most onto
//! the hit normal is treated as "up", so props keep working on floors, walls
//! and ceilings alike.

use glam::{Quat, Vec3};
use placement::math::nearest_axis;
use placement::settings::PinSettings;
use placement::types::StrokeSlot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::{ToolContext, ToolState};

/// Placement data of one pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinData {
    position: Vec3,
    normal: Vec3,
    /// Spin around the hit normal, radians.
    yaw: f32,
}

impl Default for PinData {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            yaw: 0.0,
        }
    }
}

impl PinData {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}

/// Single-placement brush.
#[derive(Debug, Default)]
pub struct PinTool {
    state: ToolState,
    data: PinData,
    settings: PinSettings,
    commit_requested: bool,
    revision: u64,
}

impl PinTool {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn data(&self) -> &PinData {
        &self.data
    }

    pub fn settings(&self) -> &PinSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PinSettings {
        self.revision += 1;
        &mut self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn take_commit_request(&mut self) -> bool {
        std::mem::take(&mut self.commit_requested)
    }

    pub fn reset(&mut self) {
        let yaw = self.data.yaw;
        self.state = ToolState::Idle;
        self.data = PinData {
            // Spin is a brush property, not per-placement state
            yaw,
            ..PinData::default()
        };
        self.commit_requested = false;
        self.revision += 1;
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        if input.escape {
            if self.state != ToolState::Idle {
                self.reset();
                info!("pin: cancelled");
            }
            return;
        }

        if input.scroll != 0.0 {
            self.data.yaw += input.scroll * self.settings.rotation_step;
            self.bump();
        }

        match self.state {
            ToolState::Idle => {
                if input.primary.just_pressed && !input.modifiers.alt {
                    if let Some(hit) = ctx.pointer_hit(input) {
                        self.data.position = hit.point;
                        self.data.normal = hit.normal;
                        self.state = ToolState::Preview;
                        self.bump();
                        info!("pin: preview at {:?}", hit.point);
                    }
                }
            }
            ToolState::Preview => {
                if input.primary.pressed {
                    if let Some(hit) = ctx.pointer_hit(input) {
                        if hit.point != self.data.position || hit.normal != self.data.normal {
                            self.data.position = hit.point;
                            self.data.normal = hit.normal;
                            self.bump();
                        }
                    }
                }
                if input.primary.just_released {
                    self.commit_requested = true;
                }
            }
            ToolState::Edit => {}
        }
    }

    /// The single placement slot, rotated so the prefab axis nearest the hit
    /// normal points out of the surface.
    pub fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        if self.state == ToolState::Idle {
            return Vec::new();
        }
        let spin = Quat::from_axis_angle(self.data.normal, self.data.yaw);
        let local_up = nearest_axis(Quat::IDENTITY, self.data.normal);
        let align = Quat::from_rotation_arc(local_up, self.data.normal);
        let rotation = spin * align;
        vec![
            StrokeSlot::new(ctx.descriptor.id, self.data.position, 0).with_rotation(rotation),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement::math::Aabb;
    use placement::probe::{PlaneProbe, ProbeFilter, Ray};
    use placement::spatial::PaintedIndex;
    use placement::types::{PrefabDescriptor, PrefabId};

    const EPSILON: f32 = 1e-4;

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

    #[test]
    fn test_press_drag_release_commits_one() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = PinTool::default();

        let ray = Ray::new(Vec3::new(2.0, 10.0, 3.0), Vec3::NEG_Y);
        tool.handle_input(&FrameInput::click(ray), &ctx);
        assert_eq!(tool.state(), ToolState::Preview);
        assert_eq!(tool.slots(&ctx).len(), 1);

        let ray2 = Ray::new(Vec3::new(4.0, 10.0, 3.0), Vec3::NEG_Y);
        tool.handle_input(&FrameInput::drag(ray2), &ctx);
        assert!((tool.data().position() - Vec3::new(4.0, 0.0, 3.0)).length() < EPSILON);

        tool.handle_input(&FrameInput::release(ray2), &ctx);
        assert!(tool.take_commit_request());
    }

    #[test]
    fn test_scroll_spins_around_normal() {
        let probe = PlaneProbe::ground();
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = PinTool::default();

        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        tool.handle_input(&FrameInput::click(ray), &ctx);
        tool.handle_input(&FrameInput::drag(ray).with_scroll(2.0), &ctx);
        let expected = 2.0 * tool.settings().rotation_step;
        assert!((tool.data().yaw() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_wall_surface_picks_sideways_axis() {
        // A wall facing +X: the prefab's local X axis should act as up
        let probe = PlaneProbe::new(Vec3::ZERO, Vec3::X);
        let filter = ProbeFilter::default();
        let index = PaintedIndex::default();
        let ctx = test_ctx(&probe, &filter, &index);
        let mut tool = PinTool::default();

        let ray = Ray::new(Vec3::new(10.0, 1.0, 0.0), Vec3::NEG_X);
        tool.handle_input(&FrameInput::click(ray), &ctx);
        let slots = tool.slots(&ctx);
        assert_eq!(slots.len(), 1);
        // Local X rotated by the hint lands on the wall normal
        let rotated = slots[0].rotation_hint * Vec3::X;
        assert!((rotated - Vec3::X).length() < EPSILON);
    }
}
