//! Synthetic activity generator.
//!
//! Layered sinusoids at unrelated rates stand in for a live voice signal. The
//! deterministic part (`breath + pulse`) stays within
//! `[BREATH_BASE, BREATH_BASE + BREATH_SPAN + PULSE_SPAN]`; a rare random
//! spike sits on top.

use crate::constants::{
    BAND_BASE_RATE, BAND_FLOOR, BAND_LEVEL_LIFT, BAND_NOISE, BAND_RATE_STEP, BAND_SPAN,
    BREATH_BASE, BREATH_RATE, BREATH_SPAN, IDLE_BAND_VALUE, IDLE_LEVEL, PULSE_RATE, PULSE_SPAN,
    SPIKE_MIN, SPIKE_PROBABILITY, SPIKE_SPAN,
};
use crate::random::RandomSource;
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Inline capacity covers the standard tier without heap allocation.
pub type Bands = SmallVec<[f32; 12]>;

#[derive(Clone, Debug, PartialEq)]
pub struct ActivitySample {
    pub level: f32,
    pub bands: Bands,
}

impl ActivitySample {
    /// Resting sample shown before anything is published.
    pub fn idle(band_count: usize) -> Self {
        Self {
            level: IDLE_LEVEL,
            bands: SmallVec::from_elem(IDLE_BAND_VALUE, band_count),
        }
    }
}

/// Anything the scheduler can pull a per-tick sample from.
pub trait ActivitySource {
    fn band_count(&self) -> usize;
    /// `t` is elapsed active seconds. The returned sample is only valid until
    /// the next call.
    fn sample(&mut self, t: f64) -> &ActivitySample;
}

/// `sin(t * rate + phase)`, treating a non-finite angle as zero. Large
/// finite `t` can overflow the product even when `t` itself is finite.
#[inline]
fn wave(t: f64, rate: f64, phase: f64) -> f32 {
    let angle = t * rate + phase;
    if angle.is_finite() {
        angle.sin() as f32
    } else {
        0.0
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Slow baseline oscillation in `[0.12, 0.18]`.
#[inline]
pub fn breath(t: f64) -> f32 {
    let s = wave(t, BREATH_RATE as f64, 0.0);
    BREATH_BASE + BREATH_SPAN * (0.5 + 0.5 * s)
}

/// Faster ripple in `[0, 0.06]`.
#[inline]
pub fn pulse(t: f64) -> f32 {
    PULSE_SPAN * wave(t, PULSE_RATE as f64, 0.0).abs()
}

/// Rare additive burst in `[0.4, 1.0)`, else 0. Consumes one draw, or two
/// when it fires.
#[inline]
pub fn spike(rng: &mut impl RandomSource) -> f32 {
    if rng.next_unit() < SPIKE_PROBABILITY {
        SPIKE_MIN + rng.next_unit() * SPIKE_SPAN
    } else {
        0.0
    }
}

/// Noise-free band value in `[0.02, 0.22]`.
#[inline]
pub fn band_base(t: f64, i: usize, band_count: usize) -> f32 {
    let n = band_count.max(1) as f64;
    let rate = BAND_BASE_RATE as f64 + BAND_RATE_STEP as f64 * (i % 5) as f64;
    let phase = TAU * i as f64 / n;
    let v = BAND_SPAN * wave(t, rate, phase).abs();
    v.max(BAND_FLOOR)
}

pub struct ActivityGenerator<R> {
    rng: R,
    sample: ActivitySample,
}

impl<R: RandomSource> ActivityGenerator<R> {
    pub fn new(band_count: usize, rng: R) -> Self {
        Self {
            rng,
            sample: ActivitySample::idle(band_count),
        }
    }

    /// Deterministic level without the spike term.
    pub fn baseline(t: f64) -> f32 {
        breath(t) + pulse(t)
    }
}

impl<R: RandomSource> ActivitySource for ActivityGenerator<R> {
    fn band_count(&self) -> usize {
        self.sample.bands.len()
    }

    fn sample(&mut self, t: f64) -> &ActivitySample {
        let level = unit(Self::baseline(t) + spike(&mut self.rng));
        let n = self.sample.bands.len();
        // Reuse the buffer; its length is fixed at construction.
        for i in 0..n {
            let base = band_base(t, i, n);
            let noisy = base + self.rng.next_unit() * BAND_NOISE + level * BAND_LEVEL_LIFT;
            self.sample.bands[i] = unit(noisy);
        }
        self.sample.level = level;
        &self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    #[test]
    fn spike_consumes_second_draw_only_when_firing() {
        let mut quiet = crate::random::ScriptedRandom::new(vec![0.5, 0.9]);
        assert_eq!(spike(&mut quiet), 0.0);
        assert_eq!(quiet.consumed(), 1);

        let mut loud = crate::random::ScriptedRandom::new(vec![0.0, 0.5]);
        let s = spike(&mut loud);
        assert!((s - 0.7).abs() < 1e-6);
        assert_eq!(loud.consumed(), 2);
    }

    #[test]
    fn non_finite_time_is_treated_as_zero() {
        assert_eq!(breath(f64::NAN), breath(0.0));
        assert_eq!(pulse(f64::INFINITY), 0.0);
        let mut g = ActivityGenerator::new(4, FixedRandom(0.5));
        let s = g.sample(f64::NAN);
        assert!(s.level.is_finite());
        assert!(s.bands.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn overflowing_angle_falls_back_to_zero_phase() {
        assert_eq!(breath(f64::MAX), breath(0.0));
        assert_eq!(pulse(f64::MAX), 0.0);
        assert_eq!(unit(f32::NAN), 0.0);
    }
}
