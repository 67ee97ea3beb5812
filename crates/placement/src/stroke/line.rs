//! Line stroke generator: ordered points joined by straight or curved
//! segments, flattened to a polyline and walked at even spacing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{CURVE_SAMPLES, DEGENERATE_LENGTH};
use crate::settings::LineSettings;
use crate::types::{PrefabId, StrokeSlot};

use super::distribute_along_path;

/// One control point of a line stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub position: Vec3,
    /// Whether the segment leaving this point is curved.
    pub curve: bool,
}

impl LinePoint {
    pub fn straight(position: Vec3) -> Self {
        Self {
            position,
            curve: false,
        }
    }

    pub fn curved(position: Vec3) -> Self {
        Self {
            position,
            curve: true,
        }
    }
}

/// Uniform Catmull-Rom interpolation through p1..p2.
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Flatten the control points to a polyline.
///
/// Straight segments contribute their endpoint; curved segments are sampled
/// as a Catmull-Rom arc through the segment's endpoints, shaped by the
/// neighboring points. Closed paths append the wrap-around segment so the
/// polyline ends exactly at the first point. Fewer than two points yield an
/// empty polyline.
pub fn sample_path(points: &[LinePoint], closed: bool) -> Vec<Vec3> {
    if points.len() < 2 {
        return Vec::new();
    }

    let n = points.len();
    let segment_count = if closed { n } else { n - 1 };

    let at = |i: isize| -> Vec3 {
        if closed {
            points[i.rem_euclid(n as isize) as usize].position
        } else {
            points[i.clamp(0, n as isize - 1) as usize].position
        }
    };

    let mut samples = Vec::with_capacity(n + 1);
    samples.push(points[0].position);

    for seg in 0..segment_count {
        let i = seg as isize;
        let start = at(i);
        let end = at(i + 1);
        if points[seg].curve {
            let p0 = at(i - 1);
            let p3 = at(i + 2);
            for k in 1..=CURVE_SAMPLES {
                let t = k as f32 / CURVE_SAMPLES as f32;
                samples.push(catmull_rom(p0, start, end, p3, t));
            }
        } else {
            samples.push(end);
        }
    }

    samples
}

/// Total arc length of a sampled polyline.
pub fn path_length(samples: &[Vec3]) -> f32 {
    samples
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum()
}

/// Placement slots along the line path.
///
/// `item_size` substitutes for the spacing when the settings leave it
/// non-positive.
pub fn slots(
    points: &[LinePoint],
    closed: bool,
    settings: &LineSettings,
    item_size: f32,
    prefab: PrefabId,
) -> Vec<StrokeSlot> {
    let spacing = if settings.spacing > 0.0 {
        settings.spacing
    } else {
        item_size
    };
    if spacing < DEGENERATE_LENGTH {
        return Vec::new();
    }
    let samples = sample_path(points, closed);
    distribute_along_path(&samples, spacing, closed, Vec3::Y, prefab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_path_straight() {
        let points = [
            LinePoint::straight(Vec3::ZERO),
            LinePoint::straight(Vec3::new(5.0, 0.0, 0.0)),
            LinePoint::straight(Vec3::new(5.0, 0.0, 5.0)),
        ];
        let samples = sample_path(&points, false);
        assert_eq!(samples.len(), 3);
        assert!((path_length(&samples) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_sample_path_closed_wraps() {
        let points = [
            LinePoint::straight(Vec3::ZERO),
            LinePoint::straight(Vec3::new(4.0, 0.0, 0.0)),
            LinePoint::straight(Vec3::new(0.0, 0.0, 3.0)),
        ];
        let samples = sample_path(&points, true);
        assert_eq!(*samples.last().unwrap(), points[0].position);
        // 4 + 5 + 3
        assert!((path_length(&samples) - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_sample_path_curved_passes_through_endpoints() {
        let points = [
            LinePoint::straight(Vec3::ZERO),
            LinePoint::curved(Vec3::new(5.0, 0.0, 0.0)),
            LinePoint::straight(Vec3::new(10.0, 0.0, 5.0)),
        ];
        let samples = sample_path(&points, false);
        assert_eq!(samples.len(), 2 + CURVE_SAMPLES + 1);
        // The curved segment still ends exactly at its endpoint
        let end_of_curve = samples[1 + CURVE_SAMPLES];
        assert!((end_of_curve - Vec3::new(10.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_curve_is_longer_than_chord() {
        let straight = [
            LinePoint::straight(Vec3::new(-5.0, 0.0, 0.0)),
            LinePoint::straight(Vec3::new(0.0, 0.0, 5.0)),
            LinePoint::straight(Vec3::new(5.0, 0.0, 0.0)),
        ];
        let mut curved = straight;
        curved[0].curve = true;
        curved[1].curve = true;
        let flat = path_length(&sample_path(&straight, false));
        let bent = path_length(&sample_path(&curved, false));
        assert!(bent > flat - 1e-4);
    }

    #[test]
    fn test_slots_empty_below_two_points() {
        let settings = LineSettings { spacing: 1.0 };
        let slots = slots(
            &[LinePoint::straight(Vec3::ZERO)],
            false,
            &settings,
            1.0,
            PrefabId(0),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_slots_fall_back_to_item_size() {
        let points = [
            LinePoint::straight(Vec3::ZERO),
            LinePoint::straight(Vec3::new(4.0, 0.0, 0.0)),
        ];
        let settings = LineSettings { spacing: 0.0 };
        let out = slots(&points, false, &settings, 2.0, PrefabId(0));
        // 0, 2, 4
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_slots_idempotent() {
        let points = [
            LinePoint::straight(Vec3::ZERO),
            LinePoint::curved(Vec3::new(3.0, 0.0, 2.0)),
            LinePoint::straight(Vec3::new(8.0, 0.0, -1.0)),
        ];
        let settings = LineSettings { spacing: 0.5 };
        let a = slots(&points, false, &settings, 1.0, PrefabId(9));
        let b = slots(&points, false, &settings, 1.0, PrefabId(9));
        assert_eq!(a, b);
    }
}
