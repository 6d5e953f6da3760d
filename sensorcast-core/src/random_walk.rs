// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded random walk used to advance channel values.
//!
//! Each step draws a perturbation uniformly from `[-1.0, 1.0)`, adds it to the
//! current value, clamps the sum into `[min, max]` and rounds the result to
//! one decimal place. Clamping saturates: a value pinned at a bound stays
//! there until a draw pulls it back inside.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound (inclusive) of a single perturbation.
pub const STEP_LOW: f64 = -1.0;
/// Upper bound (exclusive) of a single perturbation.
pub const STEP_HIGH: f64 = 1.0;

/// Rounds half away from zero to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn floor_to_tenth(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}

pub(crate) fn ceil_to_tenth(value: f64) -> f64 {
    (value * 10.0).ceil() / 10.0
}

/// Applies one perturbation `draw` to `current`.
///
/// Rounding happens after clamping. When a bound is not itself a one-decimal
/// number, rounding could leave the range, so the result is pulled back to the
/// nearest one-decimal value inside `[min, max]`.
///
/// Callers must ensure `min < max` and that both are finite.
#[must_use]
pub fn apply_step(current: f64, min: f64, max: f64, draw: f64) -> f64 {
    let clamped = (current + draw).clamp(min, max);
    let rounded = round_to_tenth(clamped);

    if rounded > max {
        floor_to_tenth(max)
    } else if rounded < min {
        ceil_to_tenth(min)
    } else {
        rounded
    }
}

/// Random source for channel steps.
///
/// Seeded generators are fully deterministic, which is what the tests rely on.
#[derive(Debug, Clone)]
pub struct RandomWalkGenerator {
    rng: StdRng,
}

impl RandomWalkGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws one perturbation from `[STEP_LOW, STEP_HIGH)`.
    pub fn draw(&mut self) -> f64 {
        self.rng.random_range(STEP_LOW..STEP_HIGH)
    }

    /// Produces the next value for a channel currently at `current`.
    pub fn step(&mut self, current: f64, min: f64, max: f64) -> f64 {
        let draw = self.draw();
        apply_step(current, min, max, draw)
    }
}

impl Default for RandomWalkGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
