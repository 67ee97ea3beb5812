//! Circle select tool, also the eraser and the replacer.
//!
//! A circle follows the pointer over the surface; the painted objects under
//! it are gathered from the spatial index every frame. Clicking applies the
//! tool's mode to the gathered set: select reports it, erase removes it,
//! replace re-paints it with the active palette prefab. The scroll wheel
//! resizes the circle.

use glam::Vec3;
use placement::settings::CircleSettings;
use placement::stroke::circle;
use placement::types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::FrameInput;
use crate::tool::ToolContext;

/// Circle radius change per scroll notch.
const RADIUS_STEP: f32 = 0.25;

/// Smallest usable circle radius.
const MIN_RADIUS: f32 = 0.05;

/// What clicking the circle does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SelectMode {
    #[default]
    Select = 0,
    Erase = 1,
    Replace = 2,
}

/// Circle gather tool.
#[derive(Debug, Default)]
pub struct SelectTool {
    mode: SelectMode,
    settings: CircleSettings,
    /// Circle center on the surface, absent while the pointer misses.
    center: Option<Vec3>,
    /// Objects under the circle this frame.
    targets: Vec<ObjectId>,
    action_requested: bool,
    revision: u64,
}

impl SelectTool {
    pub fn with_mode(mode: SelectMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectMode) {
        if self.mode != mode {
            self.mode = mode;
            self.revision += 1;
        }
    }

    pub fn settings(&self) -> &CircleSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut CircleSettings {
        self.revision += 1;
        &mut self.settings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn center(&self) -> Option<Vec3> {
        self.center
    }

    /// Objects currently under the circle.
    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }

    /// The gathered set when the designer clicked this frame.
    pub fn take_action(&mut self) -> Option<(SelectMode, Vec<ObjectId>)> {
        if std::mem::take(&mut self.action_requested) {
            Some((self.mode, self.targets.clone()))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.center = None;
        self.targets.clear();
        self.action_requested = false;
        self.revision += 1;
    }

    pub fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        if input.escape {
            self.reset();
            info!("select: cleared");
            return;
        }

        if input.scroll != 0.0 {
            let radius = &mut self.settings.radius;
            *radius = (*radius + input.scroll * RADIUS_STEP).max(MIN_RADIUS);
            self.revision += 1;
        }

        let Some(pointer) = input.pointer else {
            self.center = None;
            self.targets.clear();
            return;
        };
        let Some(hit) = ctx.pointer_hit(input) else {
            self.center = None;
            self.targets.clear();
            return;
        };

        self.center = Some(hit.point);
        self.targets = circle::gather(ctx.index, pointer.ray, hit.point, self.settings.radius);

        if input.primary.just_pressed && !input.modifiers.alt {
            self.action_requested = true;
            info!(
                "select: {:?} applied to {} objects",
                self.mode,
                self.targets.len()
            );
        }
    }
}
