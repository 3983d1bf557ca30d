use std::f64::consts::TAU;

use crate::item::{Item, ItemId};

/// Expansion policy for split items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Each item's splits sit back to back.
    #[default]
    Sequential,
    /// Splits are dealt round-robin across items.
    Interleaved,
}

impl Layout {
    pub fn from_shuffled(shuffled: bool) -> Self {
        if shuffled {
            Layout::Interleaved
        } else {
            Layout::Sequential
        }
    }
}

/// One angular slice of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub source_item_id: ItemId,
    pub display_name: String,
    pub fill_color: String,
    pub text_color: String,
    pub text_size: f64,
    pub slice_weight: f64,
}

impl Segment {
    fn slice_of(item: &Item) -> Self {
        Segment {
            source_item_id: item.id.clone(),
            display_name: item.name.clone(),
            fill_color: item.color.clone(),
            text_color: item.text_color.clone(),
            text_size: item.text_size,
            slice_weight: item.weight / f64::from(item.split_count.max(1)),
        }
    }
}

/// Angular interval of a segment on the unrotated wheel, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentSequence {
    segments: Vec<Segment>,
    total_weight: f64,
}

impl SegmentSequence {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Pairs every segment with its span on the unrotated wheel.
    pub fn spans(&self) -> impl Iterator<Item = (&Segment, Span)> + '_ {
        let total = self.total_weight;
        let mut cumulative = 0.0;
        self.segments.iter().map(move |segment| {
            let start = cumulative;
            cumulative += segment.slice_weight;
            let span = Span {
                start: start / total * TAU,
                end: cumulative / total * TAU,
            };
            (segment, span)
        })
    }
}

impl<'a> IntoIterator for &'a SegmentSequence {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

pub fn build_segments(items: &[Item], layout: Layout) -> SegmentSequence {
    let segments: Vec<Segment> = match layout {
        Layout::Sequential => items
            .iter()
            .flat_map(|item| {
                let slice = Segment::slice_of(item);
                std::iter::repeat(slice).take(item.split_count.max(1) as usize)
            })
            .collect(),
        Layout::Interleaved => {
            let passes = items.iter().map(|item| item.split_count.max(1)).max().unwrap_or(0);
            let mut segments = Vec::new();
            for pass in 0..passes {
                for item in items.iter().filter(|item| item.split_count.max(1) > pass) {
                    segments.push(Segment::slice_of(item));
                }
            }
            segments
        }
    };
    let total_weight = segments.iter().map(|segment| segment.slice_weight).sum();
    SegmentSequence {
        segments,
        total_weight,
    }
}
