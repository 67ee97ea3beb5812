//! Wall tool: runs a row of wall modules between two snapped grid points.
//!
//! First click snaps the start point to the grid; the end point then tracks
//! the pointer (snapped) until a second click establishes the run. Endpoints
//! stay draggable in edit state, Enter commits, and cells already occupied
//! by painted objects are skipped by the generator.

use glam::Vec3;
use placement::settings::WallSettings;
use placement::stroke::wall::{self, snap_to_grid};
use placement::types::StrokeSlot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::{HANDLE_PICK_RADIUS, ToolContext, ToolState, pick_handle};

/// Persistent control-point data of one wall run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WallData {
    start: Vec3,
    end: Vec3,
}

impl WallData {
    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }
}

/// Wall run painting tool.
#[derive(Debug, Default)]
pub struct WallTool {
    state: ToolState,
    data: WallData,
    settings: WallSettings,
    /// 0 = start handle, 1 = end handle.
    selected_handle: Option<usize>,
    commit_requested: bool,
    revision: u64,
}

impl WallTool {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn data(&self) -> &WallData {
        &self.data
    }

    pub fn settings(&self) -> &WallSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut WallSettings {
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
        self.state = ToolState::Idle;
        self.data = WallData::default();
        self.selected_handle = None;
        self.commit_requested = false;
        self.revision += 1;
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn snapped_pointer(&self, input: &FrameInput, ctx: &ToolContext) -> Option<Vec3> {
        ctx.pointer_hit(input)
            .map(|hit| snap_to_grid(hit.point, self.settings.snap_step))
    }

    pub fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        if input.escape {
            if self.state == ToolState::Edit && self.selected_handle.is_some() {
                self.selected_handle = None;
                info!("wall: handle deselected");
            } else if self.state != ToolState::Idle {
                self.reset();
                info!("wall: cancelled");
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
                    if let Some(point) = self.snapped_pointer(input, ctx) {
                        self.data = WallData {
                            start: point,
                            end: point,
                        };
                        self.state = ToolState::Preview;
                        self.bump();
                        info!("wall: run started at {:?}", point);
                    }
                }
            }
            ToolState::Preview => {
                if let Some(point) = self.snapped_pointer(input, ctx) {
                    if point != self.data.end {
                        self.data.end = point;
                        self.bump();
                    }
                }
                if input.primary.just_pressed && !input.modifiers.alt {
                    self.state = ToolState::Edit;
                    info!("wall: run established {:?} -> {:?}", self.data.start, self.data.end);
                }
            }
            ToolState::Edit => {
                if input.primary.just_pressed {
                    if let Some(pointer) = input.pointer {
                        let handles = [self.data.start, self.data.end];
                        self.selected_handle =
                            pick_handle(&handles, pointer.ray, HANDLE_PICK_RADIUS);
                    }
                } else if input.primary.pressed {
                    if let (Some(handle), Some(point)) =
                        (self.selected_handle, self.snapped_pointer(input, ctx))
                    {
                        if handle == 0 {
                            self.data.start = point;
                        } else {
                            self.data.end = point;
                        }
                        self.bump();
                    }
                }
            }
        }
    }

    /// Placement slots, one per unoccupied wall cell.
    pub fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        if self.state == ToolState::Idle {
            return Vec::new();
        }
        wall::slots(
            self.data.start,
            self.data.end,
            &self.settings,
            ctx.descriptor.id,
            ctx.index,
        )
    }
}
