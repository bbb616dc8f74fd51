// Host-side tests for the synthetic activity generator.

use hud_core::activity::{band_base, breath, pulse, ActivityGenerator, ActivitySource};
use hud_core::random::{FixedRandom, ScriptedRandom, UniformRandom};
use hud_core::tier::FidelityTier;
use proptest::prelude::*;

const EPS: f32 = 1e-6;

#[test]
fn quiet_level_at_landmark_times_stays_under_deterministic_bound() {
    let mut g = ActivityGenerator::new(12, FixedRandom(0.5));
    for t in [0.0, 1.0, 2.0, 5.0] {
        let s = g.sample(t);
        assert!(s.level >= 0.12 && s.level <= 0.24, "t={} level={}", t, s.level);
        assert_eq!(s.bands.len(), 12);
    }
}

#[test]
fn level_and_bands_stay_in_unit_range_at_landmark_times() {
    let mut g = ActivityGenerator::new(12, UniformRandom::seeded(7));
    for t in [0.0, 1.0, 2.0, 5.0, 1.0e6, 1.0e12, 1.0e308, f64::MAX] {
        let s = g.sample(t);
        assert!((0.0..=1.0).contains(&s.level), "t={} level={}", t, s.level);
        assert_eq!(s.bands.len(), 12);
        for b in &s.bands {
            assert!((0.0..=1.0).contains(b), "t={} band={}", t, b);
        }
    }
}

#[test]
fn quiet_generator_at_t0_is_breath_midpoint() {
    // 0.5 is above the spike probability, so no draw ever spikes.
    let mut g = ActivityGenerator::new(6, FixedRandom(0.5));
    let s = g.sample(0.0);
    assert!((s.level - 0.15).abs() < EPS);
    for (i, b) in s.bands.iter().enumerate() {
        let expected = band_base(0.0, i, 6) + 0.5 * 0.02 + 0.15 * 0.04;
        assert!((b - expected).abs() < EPS, "band {}: {} vs {}", i, b, expected);
    }
}

#[test]
fn forced_spike_lifts_level_and_clamps() {
    let mut g = ActivityGenerator::new(4, FixedRandom(0.0));
    let s = g.sample(0.0);
    // 0.15 baseline + 0.4 minimum burst
    assert!((s.level - 0.55).abs() < EPS);

    let mut g = ActivityGenerator::new(4, ScriptedRandom::new(vec![0.0, 0.999]));
    for t in [0.0, 0.5, 2.6] {
        assert!(g.sample(t).level <= 1.0);
    }
}

#[test]
fn band_count_never_changes_across_samples() {
    for tier in [FidelityTier::Standard, FidelityTier::Reduced] {
        let n = tier.profile().band_count;
        let mut g = ActivityGenerator::new(n, UniformRandom::seeded(3));
        for step in 0..500 {
            assert_eq!(g.sample(step as f64 * 0.033).bands.len(), n);
        }
        assert_eq!(g.band_count(), n);
    }
}

#[test]
fn band_base_respects_floor() {
    // sin(0) == 0 for band 0 at t=0, so the floor applies.
    assert!((band_base(0.0, 0, 12) - 0.02).abs() < EPS);
    for i in 0..12 {
        let v = band_base(1.7, i, 12);
        assert!((0.02..=0.22 + EPS).contains(&v));
    }
}

proptest! {
    #[test]
    fn deterministic_part_stays_in_band(t in 0.0f64..f64::MAX) {
        let b = breath(t);
        let p = pulse(t);
        prop_assert!(b >= 0.12 - EPS && b <= 0.18 + EPS, "breath({})={}", t, b);
        prop_assert!(p >= 0.0 && p <= 0.06 + EPS, "pulse({})={}", t, p);
    }

    #[test]
    fn sample_is_clamped_for_any_time_and_draw(t in 0.0f64..f64::MAX, draw in 0.0f32..1.0) {
        let mut g = ActivityGenerator::new(12, FixedRandom(draw));
        let s = g.sample(t);
        prop_assert!(s.level >= 0.0 && s.level <= 1.0, "t={} level={}", t, s.level);
        prop_assert_eq!(s.bands.len(), 12);
        prop_assert!(s.bands.iter().all(|b| *b >= 0.0 && *b <= 1.0));
    }

    #[test]
    fn no_spike_keeps_level_near_baseline(t in 0.0f64..1.0e4) {
        let mut g = ActivityGenerator::new(6, FixedRandom(0.5));
        let s = g.sample(t);
        prop_assert!((s.level - ActivityGenerator::<FixedRandom>::baseline(t)).abs() < EPS);
        prop_assert!(s.level <= 0.24 + EPS);
    }
}
