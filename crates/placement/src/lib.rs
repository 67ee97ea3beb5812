//! worldbrush placement core - surface-relative placement geometry
//!
//! This crate turns tool control points into final world transforms for
//! prefab instances scattered over arbitrary surfaces:
//! - [`math`] - stateless geometry primitives
//! - [`probe`] - the surface probe boundary and the plane fallback
//! - [`conform`] - embedding offsets and surface-aligned rotation
//! - [`spatial`] - octree of painted object bounds
//! - [`stroke`] - per-tool slot generators (line, shape, tiling, wall, circle)
//! - [`resolve`] - staged slot-to-transform resolution
//!
//! The crate is designed to be driven by an editor host's frame callback but
//! does not depend on any engine itself.

pub mod conform;
pub mod constants;
pub mod math;
pub mod probe;
pub mod resolve;
pub mod settings;
pub mod spatial;
pub mod stroke;
pub mod types;

pub use conform::*;
pub use constants::*;
pub use math::*;
pub use probe::*;
pub use resolve::*;
pub use settings::*;
pub use spatial::*;
pub use types::*;
