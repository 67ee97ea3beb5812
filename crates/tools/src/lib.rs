//! worldbrush tools - brush-tool state machines and the placement session
//!
//! This crate drives the placement core from editor input:
//! - [`input`] - the per-frame polled input snapshot
//! - [`tool`] - the shared control-point lifecycle (idle, preview, edit)
//! - [`shape`], [`tiling`], [`wall`], [`line`], [`pin`], [`select`] - one
//!   state machine per brush tool
//! - [`session`] - the per-scene controller that owns the palette, the
//!   spatial index and the active tool, and runs the frame pipeline
//! - [`commit`] - the persistence boundary finished strokes are handed to
//!
//! Everything runs synchronously inside the host editor's per-frame update
//! callback; there is no threading and no locking.

pub mod commit;
pub mod input;
pub mod line;
pub mod pin;
pub mod select;
pub mod session;
pub mod shape;
pub mod tiling;
pub mod tool;
pub mod wall;

pub use commit::*;
pub use input::*;
pub use line::{LineData, LineTool};
pub use pin::{PinData, PinTool};
pub use select::{SelectMode, SelectTool};
pub use session::*;
pub use shape::{ShapeData, ShapeTool};
pub use tiling::{TilingData, TilingTool};
pub use tool::*;
pub use wall::{WallData, WallTool};
