//! Shape tool: paints prefabs along a circle or polygon perimeter.
//!
//! First click seeds the center on the surface under the pointer; the radius
//! point then tracks the pointer on the shape's plane until a second click
//! establishes the control-point set. In edit state both points are
//! draggable, Enter commits and Escape walks back.

use glam::Vec3;
use placement::probe::{PlaneProbe, ProbeFilter, SurfaceProbe};
use placement::settings::ShapeSettings;
use placement::stroke::shape;
use placement::types::StrokeSlot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::{HANDLE_PICK_RADIUS, POINTER_PROBE_DISTANCE, ToolContext, ToolState, pick_handle};

/// Persistent control-point data of one shape stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    center: Vec3,
    radius_point: Vec3,
    normal: Vec3,
}

impl Default for ShapeData {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius_point: Vec3::ZERO,
            normal: Vec3::Y,
        }
    }
}

impl ShapeData {
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius_point(&self) -> Vec3 {
        self.radius_point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn radius(&self) -> f32 {
        (self.radius_point - self.center).length()
    }
}

/// Circle/polygon perimeter painting tool.
#[derive(Debug, Default)]
pub struct ShapeTool {
    state: ToolState,
    data: ShapeData,
    settings: ShapeSettings,
    /// 0 = center handle, 1 = radius handle.
    selected_handle: Option<usize>,
    commit_requested: bool,
    revision: u64,
}

impl ShapeTool {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn data(&self) -> &ShapeData {
        &self.data
    }

    pub fn settings(&self) -> &ShapeSettings {
        &self.settings
    }

    /// Mutable settings access; counts as a change for cache invalidation.
    pub fn settings_mut(&mut self) -> &mut ShapeSettings {
        self.revision += 1;
        &mut self.settings
    }

    /// Token bumped by every control-point or settings mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The shape's own plane, the ON_SHAPE probe fallback.
    pub fn plane(&self) -> PlaneProbe {
        PlaneProbe::new(self.data.center, self.data.normal)
    }

    pub fn take_commit_request(&mut self) -> bool {
        std::mem::take(&mut self.commit_requested)
    }

    pub fn reset(&mut self) {
        self.state = ToolState::Idle;
        self.data = ShapeData::default();
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
                info!("shape: handle deselected");
            } else if self.state != ToolState::Idle {
                self.reset();
                info!("shape: cancelled");
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
                        self.data = ShapeData {
                            center: hit.point,
                            radius_point: hit.point,
                            normal: hit.normal,
                        };
                        self.state = ToolState::Preview;
                        self.bump();
                        info!("shape: preview started at {:?}", hit.point);
                    }
                }
            }
            ToolState::Preview => {
                if let Some(point) = self.pointer_on_plane(input) {
                    if point != self.data.radius_point {
                        self.data.radius_point = point;
                        self.bump();
                    }
                }
                if input.primary.just_pressed && !input.modifiers.alt {
                    self.state = ToolState::Edit;
                    info!("shape: control points established, radius {}", self.data.radius());
                }
            }
            ToolState::Edit => {
                if input.primary.just_pressed {
                    if let Some(pointer) = input.pointer {
                        let handles = [self.data.center, self.data.radius_point];
                        self.selected_handle =
                            pick_handle(&handles, pointer.ray, HANDLE_PICK_RADIUS);
                    }
                } else if input.primary.pressed {
                    if let (Some(handle), Some(point)) =
                        (self.selected_handle, self.pointer_on_plane(input))
                    {
                        match handle {
                            0 => {
                                let delta = point - self.data.center;
                                self.data.center += delta;
                                self.data.radius_point += delta;
                            }
                            _ => self.data.radius_point = point,
                        }
                        self.bump();
                    }
                }
            }
        }
    }

    /// Placement slots for the current control points.
    pub fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        if self.state == ToolState::Idle {
            return Vec::new();
        }
        shape::slots(
            self.data.center,
            self.data.radius_point,
            self.data.normal,
            &self.settings,
            ctx.descriptor.planar_size(),
            ctx.descriptor.id,
        )
    }
}
