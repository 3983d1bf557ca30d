use crate::segment::{Segment, SegmentSequence};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: String,
    pub is_light_mode: bool,
}

/// Draw geometry for one segment, already offset by the wheel rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge<'a> {
    pub segment: &'a Segment,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Wedge<'_> {
    /// Where the label is centered.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Everything a drawing surface needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest<'a> {
    pub segments: &'a SegmentSequence,
    pub current_rotation: f64,
    pub theme: &'a Theme,
}

impl<'a> DrawRequest<'a> {
    pub fn wedges(&self) -> impl Iterator<Item = Wedge<'a>> + 'a {
        let rotation = self.current_rotation;
        let segments: &'a SegmentSequence = self.segments;
        segments.spans().map(move |(segment, span)| Wedge {
            segment,
            start_angle: rotation + span.start,
            end_angle: rotation + span.end,
        })
    }
}

pub trait Presentation {
    fn draw(&mut self, request: &DrawRequest<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Tick,
    Win,
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}
