use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::segment::SegmentSequence;

pub const MIN_TURNS: f64 = 5.0;
pub const TICK_INTERVAL_RAD: f64 = 0.5;

/// Deceleration curve mapping linear time progress to rotation progress.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Whole turns added on top of the random offset.
pub fn turns_for(duration_secs: f64) -> f64 {
    MIN_TURNS.max((duration_secs * 2.0).floor())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSession {
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub duration_ms: f64,
}

impl SpinSession {
    /// Clamped linear progress for the given time since spin start.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms.max(0.0) / self.duration_ms).min(1.0)
    }

    pub fn rotation_at(&self, elapsed_ms: f64) -> f64 {
        let eased = ease_out_cubic(self.progress(elapsed_ms));
        self.start_rotation + (self.target_rotation - self.start_rotation) * eased
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinEvent {
    Tick,
    Settled { rotation: f64 },
}

/// Owns the cumulative wheel rotation and the active spin, if any.
#[derive(Debug, Clone)]
pub struct SpinEngine {
    rotation: f64,
    session: Option<SpinSession>,
    last_tick: f64,
    rng: StdRng,
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Seed RNG for reproducible spins
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        SpinEngine {
            rotation: 0.0,
            session: None,
            last_tick: 0.0,
            rng,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Starts a spin. Returns None (and changes nothing) when a spin is
    /// already running or there is nothing to spin.
    pub fn start(&mut self, segments: &SegmentSequence, duration_secs: f64) -> Option<SpinSession> {
        if self.session.is_some() {
            log::debug!("spin rejected: already spinning");
            return None;
        }
        if segments.is_empty() {
            log::debug!("spin rejected: no segments");
            return None;
        }
        let offset = self.rng.gen_range(0.0..TAU);
        let start_rotation = self.rotation;
        let session = SpinSession {
            start_rotation,
            target_rotation: start_rotation + turns_for(duration_secs) * TAU + offset,
            duration_ms: duration_secs * 1000.0,
        };
        self.last_tick = start_rotation;
        self.session = Some(session);
        log::info!(
            "spin started: {:.3} -> {:.3} rad over {} ms",
            session.start_rotation,
            session.target_rotation,
            session.duration_ms
        );
        Some(session)
    }

    /// Moves the wheel to where it should be `elapsed_ms` after spin start.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<SpinEvent> {
        let session = self.session?;
        let progress = session.progress(elapsed_ms);
        // never step backwards, even if the caller's clock does
        self.rotation = self.rotation.max(session.rotation_at(elapsed_ms));

        if progress >= 1.0 {
            self.rotation = session.target_rotation;
            self.session = None;
            return Some(SpinEvent::Settled {
                rotation: self.rotation,
            });
        }
        if self.rotation - self.last_tick > TICK_INTERVAL_RAD {
            self.last_tick = self.rotation;
            return Some(SpinEvent::Tick);
        }
        None
    }

    /// Drops the active spin, leaving rotation where it is.
    pub fn reset(&mut self) {
        self.session = None;
    }
}
