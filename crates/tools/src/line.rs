//! Line tool: paints prefabs along a multi-point path with straight and
//! curved segments.
//!
//! Clicks append points while the newest point tracks the pointer;
//! Control+click marks the placed point as curved. Enter finishes placing
//! and moves to edit state (points draggable, curve flags toggleable),
//! Enter again commits, Escape walks back.

use glam::Vec3;
use placement::settings::LineSettings;
use placement::stroke::line::{self, LinePoint};
use placement::types::StrokeSlot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::{HANDLE_PICK_RADIUS, ToolContext, ToolState, pick_handle};

/// Persistent control-point data of one line stroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineData {
    points: Vec<LinePoint>,
    closed: bool,
}

impl LineData {
    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}

/// Path painting tool.
#[derive(Debug, Default)]
pub struct LineTool {
    state: ToolState,
    data: LineData,
    settings: LineSettings,
    selected_handle: Option<usize>,
    commit_requested: bool,
    revision: u64,
}

impl LineTool {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn data(&self) -> &LineData {
        &self.data
    }

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LineSettings {
        self.revision += 1;
        &mut self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Close or open the path.
    pub fn set_closed(&mut self, closed: bool) {
        if self.data.closed != closed {
            self.data.closed = closed;
            self.revision += 1;
        }
    }

    pub fn take_commit_request(&mut self) -> bool {
        std::mem::take(&mut self.commit_requested)
    }

    pub fn reset(&mut self) {
        self.state = ToolState::Idle;
        self.data = LineData::default();
        self.selected_handle = None;
        self.commit_requested = false;
        self.revision += 1;
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        if input.escape {
            if self.state == ToolState::Edit && self.selected_handle.is_some() {
                self.selected_handle = None;
                info!("line: handle deselected");
            } else if self.state != ToolState::Idle {
                self.reset();
                info!("line: cancelled");
            }
            return;
        }
        if input.enter {
            match self.state {
                ToolState::Preview => {
                    // Drop the live point that was tracking the pointer
                    self.data.points.pop();
                    if self.data.points.len() >= 2 {
                        self.state = ToolState::Edit;
                        self.bump();
                        info!("line: {} points established", self.data.points.len());
                    } else {
                        self.reset();
                    }
                }
                ToolState::Edit => self.commit_requested = true,
                ToolState::Idle => {}
            }
            return;
        }

        match self.state {
            ToolState::Idle => {
                if input.primary.just_pressed && !input.modifiers.alt {
                    if let Some(hit) = ctx.pointer_hit(input) {
                        self.data.points = vec![
                            LinePoint::straight(hit.point),
                            // Live point tracking the pointer
                            LinePoint::straight(hit.point),
                        ];
                        self.data.closed = false;
                        self.state = ToolState::Preview;
                        self.bump();
                        info!("line: path started at {:?}", hit.point);
                    }
                }
            }
            ToolState::Preview => {
                if let Some(hit) = ctx.pointer_hit(input) {
                    if let Some(live) = self.data.points.last_mut() {
                        if live.position != hit.point {
                            live.position = hit.point;
                            self.bump();
                        }
                    }
                }
                if input.primary.just_pressed && !input.modifiers.alt {
                    // Fix the live point in place; Control makes the segment
                    // leaving it curved
                    if let Some(placed) = self.data.points.last_mut() {
                        placed.curve = input.modifiers.control;
                        let position = placed.position;
                        self.data.points.push(LinePoint::straight(position));
                        self.bump();
                    }
                }
            }
            ToolState::Edit => {
                if input.primary.just_pressed {
                    if let Some(pointer) = input.pointer {
                        let handles: Vec<Vec3> =
                            self.data.points.iter().map(|p| p.position).collect();
                        let picked = pick_handle(&handles, pointer.ray, HANDLE_PICK_RADIUS);
                        if input.modifiers.control {
                            if let Some(i) = picked {
                                self.data.points[i].curve = !self.data.points[i].curve;
                                self.bump();
                            }
                        } else {
                            self.selected_handle = picked;
                        }
                    }
                } else if input.primary.pressed {
                    if let (Some(handle), Some(hit)) =
                        (self.selected_handle, ctx.pointer_hit(input))
                    {
                        if self.data.points[handle].position != hit.point {
                            self.data.points[handle].position = hit.point;
                            self.bump();
                        }
                    }
                }
            }
        }
    }

    /// Placement slots along the current path, live point included while
    /// previewing.
    pub fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        if self.state == ToolState::Idle {
            return Vec::new();
        }
        line::slots(
            &self.data.points,
            self.data.closed,
            &self.settings,
            ctx.descriptor.planar_size(),
            ctx.descriptor.id,
        )
    }
}
