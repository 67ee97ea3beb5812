//! Per-frame input snapshot.
//!
//! The host editor polls its input devices once per redraw and hands the
//! core a snapshot; nothing here is buffered across frames. Edge states
//! (just pressed / just released) are computed by the host against the
//! previous frame.

use glam::Vec2;
use placement::probe::Ray;
use serde::{Deserialize, Serialize};

/// Edge-aware state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl ButtonState {
    pub fn down() -> Self {
        Self {
            pressed: true,
            just_pressed: true,
            just_released: false,
        }
    }

    pub fn held() -> Self {
        Self {
            pressed: true,
            just_pressed: false,
            just_released: false,
        }
    }

    pub fn up() -> Self {
        Self {
            pressed: false,
            just_pressed: false,
            just_released: true,
        }
    }
}

/// Modifier keys held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

/// Pointer position, as a viewport coordinate and the pick ray through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub viewport: Vec2,
    pub ray: Ray,
}

/// Everything the tools see of one frame's input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Pointer sample, absent when the cursor left the viewport.
    pub pointer: Option<PointerSample>,
    /// Primary (paint) mouse button.
    pub primary: ButtonState,
    pub modifiers: Modifiers,
    /// Enter was pressed this frame.
    pub enter: bool,
    /// Escape was pressed this frame.
    pub escape: bool,
    /// Scroll wheel delta, notches.
    pub scroll: f32,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            pointer: None,
            primary: ButtonState::default(),
            modifiers: Modifiers::default(),
            enter: false,
            escape: false,
            scroll: 0.0,
        }
    }
}

impl FrameInput {
    /// A frame with no input at all.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A frame with the pointer hovering at `ray`.
    pub fn hover(ray: Ray) -> Self {
        Self {
            pointer: Some(PointerSample {
                viewport: Vec2::ZERO,
                ray,
            }),
            ..Self::default()
        }
    }

    /// A frame clicking the primary button at `ray`.
    pub fn click(ray: Ray) -> Self {
        Self {
            primary: ButtonState::down(),
            ..Self::hover(ray)
        }
    }

    /// A frame dragging with the primary button held at `ray`.
    pub fn drag(ray: Ray) -> Self {
        Self {
            primary: ButtonState::held(),
            ..Self::hover(ray)
        }
    }

    /// A frame releasing the primary button at `ray`.
    pub fn release(ray: Ray) -> Self {
        Self {
            primary: ButtonState::up(),
            ..Self::hover(ray)
        }
    }

    /// A frame pressing Enter.
    pub fn press_enter() -> Self {
        Self {
            enter: true,
            ..Self::default()
        }
    }

    /// A frame pressing Escape.
    pub fn press_escape() -> Self {
        Self {
            escape: true,
            ..Self::default()
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn with_control(mut self) -> Self {
        self.modifiers.control = true;
        self
    }

    pub fn with_scroll(mut self, notches: f32) -> Self {
        self.scroll = notches;
        self
    }
}
