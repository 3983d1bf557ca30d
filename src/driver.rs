use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::outcome::Winner;
use crate::spin::SpinEvent;
use crate::wheel::Wheel;

/// Spins the wheel and drives it frame by frame until it settles.
/// Returns None straight away if the wheel refused to spin.
pub async fn run_spin(wheel: &mut Wheel, frame: Duration) -> Option<Winner> {
    if !wheel.request_spin() {
        return None;
    }
    let started = Instant::now();
    let mut frames = time::interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        frames.tick().await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(SpinEvent::Settled { .. }) = wheel.advance(elapsed_ms) {
            return wheel.result().cloned();
        }
    }
}
