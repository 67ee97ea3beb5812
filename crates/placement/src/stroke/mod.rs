//! Stroke generators: tool geometry in, ordered placement slots out.
//!
//! Each generator is a pure function of its control points and settings.
//! Recomputation with unchanged inputs yields bit-identical slot sequences,
//! and `source_index` is stable so object identities survive control-point
//! edits.

pub mod circle;
pub mod line;
pub mod shape;
pub mod tiling;
pub mod wall;

use glam::Vec3;

use crate::constants::DEGENERATE_LENGTH;
use crate::math::look_rotation;
use crate::types::{PrefabId, StrokeSlot};

/// Distribute slots along a sampled polyline at even arc-length intervals.
///
/// Open paths get a slot at the start and then every `spacing` after it;
/// closed paths skip the slot that would coincide with the start. Each slot's
/// rotation hint faces the local tangent with `up` as the up reference.
pub(crate) fn distribute_along_path(
    samples: &[Vec3],
    spacing: f32,
    closed: bool,
    up: Vec3,
    prefab: PrefabId,
) -> Vec<StrokeSlot> {
    if samples.len() < 2 || spacing <= 0.0 {
        return Vec::new();
    }

    let total: f32 = samples
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum();
    if total < DEGENERATE_LENGTH {
        return Vec::new();
    }

    let count = if closed {
        (total / spacing).floor() as usize
    } else {
        (total / spacing).floor() as usize + 1
    };

    let mut slots = Vec::with_capacity(count);
    let mut segment = 0usize;
    let mut traveled = 0.0_f32;
    let mut seg_start = samples[0];
    let mut seg_vec = samples[1] - samples[0];
    let mut seg_len = seg_vec.length();

    for i in 0..count {
        let target = i as f32 * spacing;
        // Advance to the segment containing the target distance
        while target > traveled + seg_len && segment + 2 < samples.len() {
            traveled += seg_len;
            segment += 1;
            seg_start = samples[segment];
            seg_vec = samples[segment + 1] - samples[segment];
            seg_len = seg_vec.length();
        }
        if seg_len < DEGENERATE_LENGTH {
            // Coincident samples; skip the degenerate stretch
            continue;
        }
        let along = (target - traveled).clamp(0.0, seg_len);
        let tangent = seg_vec / seg_len;
        let position = seg_start + tangent * along;
        let rotation = look_rotation(tangent, up).unwrap_or(glam::Quat::IDENTITY);
        slots.push(StrokeSlot::new(prefab, position, i as u32).with_rotation(rotation));
    }

    slots
}
