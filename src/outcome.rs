use std::f64::consts::{PI, TAU};

use crate::item::ItemId;
use crate::segment::SegmentSequence;

/// Pointer position on the unrotated wheel (top, canvas convention).
pub const POINTER_ANGLE: f64 = 1.5 * PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub index: usize,
    pub item_id: ItemId,
    pub display_name: String,
    pub fill_color: String,
}

/// Maps a rotation to the wheel angle currently under the pointer, in `[0, 2π)`.
pub fn pointer_angle_on_wheel(rotation: f64) -> f64 {
    let norm = rotation.rem_euclid(TAU);
    let angle = (POINTER_ANGLE - norm).rem_euclid(TAU);
    // rem_euclid may round up to the modulus itself
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Returns the segment under the pointer, or None when the wheel is empty or
/// the angle falls outside every span through rounding.
pub fn resolve(rotation: f64, segments: &SegmentSequence) -> Option<Winner> {
    if segments.is_empty() || segments.total_weight() <= 0.0 {
        return None;
    }
    let angle = pointer_angle_on_wheel(rotation);
    segments
        .spans()
        .enumerate()
        .find(|(_, (_, span))| span.contains(angle))
        .map(|(index, (segment, _))| Winner {
            index,
            item_id: segment.source_item_id.clone(),
            display_name: segment.display_name.clone(),
            fill_color: segment.fill_color.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDraft, ItemRegistry};
    use crate::segment::{build_segments, Layout};

    /// Rotation that puts `angle` of the unrotated wheel under the pointer.
    fn rotation_for(angle: f64) -> f64 {
        POINTER_ANGLE - angle
    }

    fn wheel(entries: &[(&str, f64, u32)], layout: Layout) -> SegmentSequence {
        let mut registry = ItemRegistry::new();
        for (name, weight, splits) in entries {
            registry.add(ItemDraft::new(*name, "#000000").weight(*weight).split_count(*splits));
        }
        build_segments(registry.items(), layout)
    }

    #[test]
    fn pointer_angle_wraps_into_range() {
        assert!((pointer_angle_on_wheel(0.0) - POINTER_ANGLE).abs() < 1e-12);
        assert!((pointer_angle_on_wheel(POINTER_ANGLE)).abs() < 1e-12);
        let angle = pointer_angle_on_wheel(-123.456);
        assert!((0.0..TAU).contains(&angle));
    }

    #[test]
    fn weighted_quarters() {
        let segments = wheel(&[("A", 1.0, 1), ("B", 3.0, 1)], Layout::Sequential);

        let a = resolve(rotation_for(0.0), &segments).unwrap();
        assert_eq!(a.display_name, "A");
        let b = resolve(rotation_for(1.5 * PI), &segments).unwrap();
        assert_eq!(b.display_name, "B");
        let edge = resolve(rotation_for(PI / 2.0 + 1e-9), &segments).unwrap();
        assert_eq!(edge.index, 1);
    }

    #[test]
    fn every_angle_has_exactly_one_winner() {
        let segments = wheel(&[("A", 1.0, 3), ("B", 2.5, 2), ("C", 0.1, 1)], Layout::Interleaved);
        let samples = 10_000;
        for i in 0..samples {
            let angle = TAU * i as f64 / samples as f64;
            let hits = segments.spans().filter(|(_, span)| span.contains(angle)).count();
            assert_eq!(hits, 1, "angle {angle}");
            assert!(resolve(rotation_for(angle), &segments).is_some());
        }
    }

    #[test]
    fn split_item_resolves_to_same_source() {
        let segments = wheel(&[("A", 2.0, 2)], Layout::Sequential);
        let first = resolve(rotation_for(0.5), &segments).unwrap();
        let second = resolve(rotation_for(PI + 0.5), &segments).unwrap();

        assert_eq!(first.index, 0);
        assert_eq!(second.index, 1);
        assert_eq!(first.item_id, second.item_id);
    }

    #[test]
    fn empty_wheel_has_no_winner() {
        let segments = SegmentSequence::default();
        assert_eq!(resolve(0.0, &segments), None);
        assert_eq!(resolve(4.2, &segments), None);
    }
}
