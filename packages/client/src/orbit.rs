//! Positions along a circle, for hands-free demos.

use std::f64::consts::TAU;

/// Positions per full turn
pub const STEPS_PER_TURN: u32 = 120;

/// Position at `tick` on a circle of `radius` centered at `(radius, radius)`,
/// so every coordinate stays non-negative.
pub fn orbit_position(tick: u64, radius: f64) -> (f64, f64) {
    let angle = TAU * (tick % u64::from(STEPS_PER_TURN)) as f64 / f64::from(STEPS_PER_TURN);
    (radius + radius * angle.cos(), radius + radius * angle.sin())
}
