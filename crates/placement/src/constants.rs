/// Squared cross-product magnitude at or below which two directions count as parallel.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// Coplanarity tolerance for the segment intersection test (sin of 0.01 degrees).
pub const PLANAR_TOLERANCE: f32 = 1.75e-4;

/// Slack when bounds-checking an intersection point against segment extents.
pub const BOUNDS_TOLERANCE: f32 = 0.001;

/// Length below which a direction vector is degenerate.
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Minimum side count for auto-tessellated circle shapes.
pub const MIN_CIRCLE_SIDES: u32 = 32;

/// Minimum side count for user polygons.
pub const MIN_POLYGON_SIDES: u32 = 3;

/// Near-1.0 slack on the wall overlap distance check.
pub const OVERLAP_TOLERANCE: f32 = 0.9999;

/// Samples per curved line segment when flattening to a polyline.
pub const CURVE_SAMPLES: usize = 16;

/// How far above the tangent position a surface probe ray starts.
pub const PROBE_HEIGHT: f32 = 10.0;

/// Default reach of surface probe rays.
pub const PROBE_DISTANCE: f32 = 1000.0;
